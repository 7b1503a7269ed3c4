//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc, time::Duration};

use config::{ConfigBuilder, builder::DefaultState};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::base::{
    error::{AssistantError, AssistantResult},
    prompts,
};

/// Default LLM endpoint (Mistral's OpenAI-compatible API).
fn default_llm_base_url() -> String {
    "https://api.mistral.ai/v1".to_string()
}

/// Default LLM model to use.
fn default_llm_model() -> String {
    "open-mistral-7b".to_string()
}

/// Default sampling temperature for the LLM.
fn default_llm_temperature() -> f32 {
    0.7
}

/// Default deadline for each LLM call, in seconds.
fn default_llm_timeout_secs() -> u64 {
    10
}

/// Default OpenWeatherMap endpoint.
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

/// Default transport timeout for the weather HTTP client, in seconds.
fn default_weather_timeout_secs() -> u64 {
    30
}

/// Default directive for the city extraction agent.
fn default_city_extraction_directive() -> String {
    prompts::CITY_EXTRACTION_DIRECTIVE.to_string()
}

/// Default directive for the answer agent.
fn default_weather_answer_directive() -> String {
    prompts::WEATHER_ANSWER_DIRECTIVE.to_string()
}

/// Configuration for the weather assistant.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// LLM API key (`WEATHER_ASSISTANT_LLM_API_KEY`).
    pub llm_api_key: String,
    /// OpenWeatherMap API key (`WEATHER_ASSISTANT_WEATHER_API_KEY`).
    pub weather_api_key: String,
    /// Base URL of the OpenAI-compatible chat API (`WEATHER_ASSISTANT_LLM_BASE_URL`).
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,
    /// LLM model to use (`WEATHER_ASSISTANT_LLM_MODEL`).
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    /// Sampling temperature for the LLM (`WEATHER_ASSISTANT_LLM_TEMPERATURE`).
    /// Value between 0 and 2.
    #[serde(default = "default_llm_temperature")]
    pub llm_temperature: f32,
    /// Max output tokens for the LLM (`WEATHER_ASSISTANT_LLM_MAX_TOKENS`).
    #[serde(default)]
    pub llm_max_tokens: Option<u32>,
    /// Deadline for each LLM call, in seconds (`WEATHER_ASSISTANT_LLM_TIMEOUT_SECS`).
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
    /// Base URL of the weather API (`WEATHER_ASSISTANT_WEATHER_BASE_URL`).
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Transport timeout for weather requests, in seconds (`WEATHER_ASSISTANT_WEATHER_TIMEOUT_SECS`).
    #[serde(default = "default_weather_timeout_secs")]
    pub weather_timeout_secs: u64,
    /// Optional custom city extraction directive (`WEATHER_ASSISTANT_CITY_EXTRACTION_DIRECTIVE`).
    #[serde(default = "default_city_extraction_directive")]
    pub city_extraction_directive: String,
    /// Optional custom answer directive (`WEATHER_ASSISTANT_WEATHER_ANSWER_DIRECTIVE`).
    #[serde(default = "default_weather_answer_directive")]
    pub weather_answer_directive: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            weather_api_key: String::new(),
            llm_base_url: default_llm_base_url(),
            llm_model: default_llm_model(),
            llm_temperature: default_llm_temperature(),
            llm_max_tokens: None,
            llm_timeout_secs: default_llm_timeout_secs(),
            weather_base_url: default_weather_base_url(),
            weather_timeout_secs: default_weather_timeout_secs(),
            city_extraction_directive: default_city_extraction_directive(),
            weather_answer_directive: default_weather_answer_directive(),
        }
    }
}

impl Config {
    /// Load the configuration from `.env`, an optional TOML file, and `WEATHER_ASSISTANT_*` variables.
    #[instrument(skip_all)]
    pub fn load(explicit_path: Option<&Path>) -> AssistantResult<Self> {
        let dotenv = read_dotenv(None)?;
        let vars = std::env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

        Self::load_from(explicit_path, dotenv, vars)
    }

    /// Load the configuration from explicit `.env` pairs and process variables.
    ///
    /// Process variables win over `.env` pairs, and both win over the TOML file.
    pub fn load_from<D, V>(explicit_path: Option<&Path>, dotenv: D, vars: V) -> AssistantResult<Self>
    where
        D: IntoIterator<Item = (String, String)>,
        V: IntoIterator<Item = (String, String)>,
    {
        let mut env: config::Map<String, String> = dotenv.into_iter().collect();
        env.extend(vars);

        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        cfg = cfg.add_source(config::Environment::default().prefix("WEATHER_ASSISTANT").source(Some(env)));

        Self::from_builder(cfg)
    }

    /// Build and validate the configuration from a prepared builder.
    pub fn from_builder(cfg: ConfigBuilder<DefaultState>) -> AssistantResult<Self> {
        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.llm_api_key.trim().is_empty() {
            return Err(AssistantError::config("LLM API key (`llm_api_key`) is not set."));
        }

        if result.weather_api_key.trim().is_empty() {
            return Err(AssistantError::config("weather API key (`weather_api_key`) is not set."));
        }

        if result.llm_temperature < 0.0 || result.llm_temperature > 2.0 {
            return Err(AssistantError::config("LLM temperature must be between 0 and 2."));
        }

        if result.llm_timeout_secs < 1 {
            return Err(AssistantError::config("LLM timeout must be at least 1 second."));
        }

        if result.weather_timeout_secs < 1 {
            return Err(AssistantError::config("weather timeout must be at least 1 second."));
        }

        Ok(result)
    }

    /// Override the LLM deadline.
    pub fn with_llm_timeout_secs(mut self, secs: u64) -> Self {
        Arc::make_mut(&mut self.inner).llm_timeout_secs = secs;
        self
    }

    /// The deadline applied to each LLM call.
    pub fn llm_deadline(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

/// Read `KEY=value` pairs from a `.env` file without touching the process environment.
///
/// With no path, `.env` is searched for from the current directory upwards. A
/// missing file yields no pairs.
pub fn read_dotenv(path: Option<&Path>) -> AssistantResult<Vec<(String, String)>> {
    let iter = match path {
        Some(path) => dotenvy::from_path_iter(path),
        None => dotenvy::dotenv_iter(),
    };

    match iter {
        Ok(iter) => {
            let pairs = iter.collect::<Result<Vec<_>, _>>().map_err(|err| AssistantError::config(format!("error loading .env file: {err}")))?;
            debug!("Loaded {} entries from .env", pairs.len());
            Ok(pairs)
        }
        Err(err) if err.not_found() => {
            debug!("No .env file found.");
            Ok(Vec::new())
        }
        Err(err) => Err(AssistantError::config(format!("error loading .env file: {err}"))),
    }
}
