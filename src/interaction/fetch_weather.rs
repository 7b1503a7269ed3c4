//! Weather lookup for an extracted city.

use tracing::{info, instrument};

use crate::{
    base::{
        error::AssistantResult,
        types::{ExtractedCity, WeatherSnapshot},
    },
    runtime::Runtime,
};

/// Fetch and validate the current weather for `city`.
///
/// This is a single request with no deadline race; the HTTP client's own
/// transport timeout is the only bound.
#[instrument(skip_all, fields(city = %city))]
pub async fn fetch_weather(runtime: &Runtime, city: &ExtractedCity) -> AssistantResult<WeatherSnapshot> {
    let snapshot = runtime.weather.current_weather(city).await?;

    info!("Weather for {}: {}, {:.2}°C", snapshot.city_name, snapshot.description, snapshot.temperature_celsius);

    Ok(snapshot)
}
