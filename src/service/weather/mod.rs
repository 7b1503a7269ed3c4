//! Integration with weather data providers.
//!
//! The `GenericWeatherClient` trait hands back an already validated
//! [`WeatherSnapshot`]; the provider-specific shape checks live in [`snapshot`].

pub mod openweather;
pub mod snapshot;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{
    error::AssistantResult,
    types::{ExtractedCity, WeatherSnapshot},
};

// Traits.

/// Generic weather client trait that clients must implement.
#[async_trait]
pub trait GenericWeatherClient: Send + Sync + 'static {
    /// Fetch the current weather for `city`, in metric units.
    async fn current_weather(&self, city: &ExtractedCity) -> AssistantResult<WeatherSnapshot>;
}

// Structs.

/// Weather client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct WeatherClient {
    inner: Arc<dyn GenericWeatherClient>,
}

impl Deref for WeatherClient {
    type Target = dyn GenericWeatherClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl WeatherClient {
    pub fn new(inner: Arc<dyn GenericWeatherClient>) -> Self {
        Self { inner }
    }
}
