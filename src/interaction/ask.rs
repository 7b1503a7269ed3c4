//! The orchestrator: one question in, one outcome out.

use tracing::{info, instrument, warn};

use super::{compose_answer::compose_answer, extract_city::extract_city, fetch_weather::fetch_weather};
use crate::{
    base::{
        error::{Stage, StageError},
        types::{ExtractedCity, Outcome, UserQuery},
    },
    runtime::Runtime,
};

/// Run the full pipeline for `query`.
///
/// Stages run strictly in order and the first failure ends the run. A quoted
/// but blank city is not an error from the extraction stage; it ends the run
/// here with [`Outcome::NoCity`].
#[instrument(skip_all)]
pub async fn ask(runtime: &Runtime, query: &UserQuery) -> Result<Outcome, StageError> {
    let deadline = runtime.config.llm_deadline();

    // Step 1: extract the city.

    let candidate = extract_city(runtime, query, deadline).await.map_err(StageError::at(Stage::CityExtraction))?;

    let Some(city) = ExtractedCity::new(&candidate) else {
        warn!("The model quoted an empty city.");
        return Ok(Outcome::NoCity);
    };

    info!("Extracted city: {city}");

    // Step 2: fetch the weather.

    let snapshot = fetch_weather(runtime, &city).await.map_err(StageError::at(Stage::WeatherFetch))?;

    // Step 3: compose the answer.

    let answer = compose_answer(runtime, query, &snapshot, deadline).await.map_err(StageError::at(Stage::ResponseComposition))?;

    Ok(Outcome::Answered(answer))
}
