//! Runtime services and shared state for the weather assistant.

use tracing::instrument;

use crate::{
    base::{config::Config, error::AssistantResult},
    service::{llm::LlmClient, weather::WeatherClient},
};

/// Runtime service context handed to every pipeline stage.
///
/// This struct holds the configuration and the service clients.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The weather client instance.
    pub weather: WeatherClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> AssistantResult<Self> {
        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the weather client.
        let weather = WeatherClient::openweather(&config)?;

        Ok(Self { config, llm, weather })
    }
}
