//! OpenWeatherMap "current weather" client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::{GenericWeatherClient, WeatherClient, snapshot::parse_weather_body};
use crate::base::{
    config::Config,
    error::{AssistantError, AssistantResult},
    types::{ExtractedCity, WeatherSnapshot},
};

// Extra methods on `WeatherClient` applied by the OpenWeatherMap implementation.

impl WeatherClient {
    pub fn openweather(config: &Config) -> AssistantResult<Self> {
        let client = OpenWeatherClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

/// OpenWeatherMap client implementation.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client against the configured base URL.
    #[instrument(name = "OpenWeatherClient::new", skip_all)]
    pub fn new(config: &Config) -> AssistantResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.weather_timeout_secs))
            .build()
            .map_err(AssistantError::transport)?;

        Ok(Self {
            client,
            base_url: config.weather_base_url.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone(),
        })
    }

    /// Build the request URL, escaping the city so it cannot break out of its query value.
    fn build_url(&self, city: &ExtractedCity, api_key: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city.as_str().trim()),
            urlencoding::encode(api_key)
        )
    }
}

#[async_trait]
impl GenericWeatherClient for OpenWeatherClient {
    #[instrument(name = "OpenWeatherClient::current_weather", skip_all)]
    async fn current_weather(&self, city: &ExtractedCity) -> AssistantResult<WeatherSnapshot> {
        info!("Requesting weather data with URL: {}", self.build_url(city, "REDACTED"));

        let response = self.client.get(self.build_url(city, &self.api_key)).send().await.map_err(AssistantError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(AssistantError::transport)?;

        if status != StatusCode::OK {
            warn!("Weather provider answered with status {status}");
            return Err(AssistantError::Provider { status: status.as_u16(), body });
        }

        debug!("Weather provider answered with {} bytes", body.len());

        parse_weather_body(&body)
    }
}
