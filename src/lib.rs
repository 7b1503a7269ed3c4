//! Library root for `weather-assistant`.
//!
//! Weather-assistant answers a natural-language weather question in three steps:
//! - An LLM pulls the city name out of the question.
//! - OpenWeatherMap supplies the current weather for that city.
//! - The LLM phrases an answer grounded in that weather.
//!
//! Each step is a function over one external call. The LLM and weather services
//! sit behind traits so that any provider (or a mock) can be plugged in.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{
    config::Config,
    error::{Stage, StageError},
    types::{Outcome, UserQuery},
};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Builds the runtime from `config` and answers exactly one question.
pub async fn start(config: Config, query: UserQuery) -> Result<Outcome, StageError> {
    info!("Starting weather-assistant ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).map_err(StageError::at(Stage::Setup))?;

    // Answer the question.
    interaction::ask::ask(&runtime, &query).await
}
