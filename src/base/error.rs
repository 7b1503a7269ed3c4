//! Error taxonomy for the weather assistant pipeline.
//!
//! Every stage returns an [`AssistantError`] to its caller; nothing is retried.
//! The orchestrator tags the failure with the [`Stage`] it came from so the
//! binary can tell the user which step went wrong.

use std::fmt;

use thiserror::Error;

pub type AssistantResult<T> = Result<T, AssistantError>;

/// The kinds of failure a pipeline stage can surface.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A required credential is missing or the configuration source is unreadable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The language model did not answer within the deadline.
    #[error("request timed out")]
    Timeout,

    /// The language model answered with zero candidate completions.
    #[error("no response choices from the language model")]
    EmptyResponse,

    /// The language model's reply held no quoted city name.
    #[error("could not extract city name from the model's response")]
    ExtractionFailed,

    /// The weather provider answered with a non-success status.
    #[error("failed to fetch weather data: status code {status}, response: {body}")]
    Provider { status: u16, body: String },

    /// The weather provider's JSON lacked a required field or had it mistyped.
    #[error("unexpected response format: {0}")]
    MalformedResponse(String),

    /// The weather provider's body was not a JSON object.
    #[error("failed to parse JSON: {message}, response body: {body}")]
    Decode { message: String, body: String },

    /// The language model call itself failed.
    #[error("language model call failed: {0:#}")]
    LlmService(anyhow::Error),

    /// The weather request could not be sent, or its body could not be read.
    ///
    /// The request URL carries the API key, so it is stripped from the source error.
    #[error("weather request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl AssistantError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl From<config::ConfigError> for AssistantError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// The pipeline step a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    CityExtraction,
    WeatherFetch,
    ResponseComposition,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Setup => "Error starting up",
            Stage::CityExtraction => "Error extracting city",
            Stage::WeatherFetch => "Error fetching weather data",
            Stage::ResponseComposition => "Error generating response",
        };

        f.write_str(label)
    }
}

/// A stage failure as surfaced to the top level.
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: AssistantError,
}

impl StageError {
    pub fn new(stage: Stage, source: AssistantError) -> Self {
        Self { stage, source }
    }

    /// Returns a closure that tags an error with `stage`, for use with `map_err`.
    pub fn at(stage: Stage) -> impl FnOnce(AssistantError) -> Self {
        move |source| Self::new(stage, source)
    }
}
