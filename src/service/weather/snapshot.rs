//! Defensive validation of OpenWeatherMap "current weather" bodies.
//!
//! The provider's JSON is checked in a fixed order so the error names the
//! first thing that is wrong: `main`, then `weather`, then `weather[0]`, then
//! the three leaf fields together. No field is ever defaulted.

use serde_json::{Map, Value};

use crate::base::{
    error::{AssistantError, AssistantResult},
    types::WeatherSnapshot,
};

/// Decode a response body and validate it into a [`WeatherSnapshot`].
pub fn parse_weather_body(body: &str) -> AssistantResult<WeatherSnapshot> {
    let data: Map<String, Value> = serde_json::from_str(body).map_err(|err| AssistantError::Decode {
        message: err.to_string(),
        body: body.to_string(),
    })?;

    validate_weather(&data)
}

/// Validate an already decoded body.
pub fn validate_weather(data: &Map<String, Value>) -> AssistantResult<WeatherSnapshot> {
    let main = data.get("main").and_then(Value::as_object).ok_or_else(|| AssistantError::malformed("main missing or invalid"))?;

    let weather = data
        .get("weather")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| AssistantError::malformed("weather missing or invalid"))?;

    let first = weather[0].as_object().ok_or_else(|| AssistantError::malformed("weather[0] missing or invalid"))?;

    let temperature = main.get("temp").and_then(Value::as_f64);
    let description = first.get("description").and_then(Value::as_str);
    let city_name = data.get("name").and_then(Value::as_str);

    match (temperature, description, city_name) {
        (Some(temperature_celsius), Some(description), Some(city_name)) => Ok(WeatherSnapshot {
            city_name: city_name.to_string(),
            description: description.to_string(),
            temperature_celsius,
        }),
        _ => Err(AssistantError::malformed("missing or invalid field(s)")),
    }
}
