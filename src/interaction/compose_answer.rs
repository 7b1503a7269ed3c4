//! Answer composition: ask the LLM to phrase a reply from the weather snapshot.

use std::time::Duration;

use tracing::{debug, instrument};

use super::deadline::race_deadline;
use crate::{
    base::{
        error::{AssistantError, AssistantResult},
        prompts::get_weather_answer_directive,
        types::{ChatMessage, FinalAnswer, UserQuery, WeatherSnapshot},
    },
    runtime::Runtime,
};

/// Ask the LLM to answer `query` using `snapshot`, racing the call against `deadline`.
#[instrument(skip_all)]
pub async fn compose_answer(runtime: &Runtime, query: &UserQuery, snapshot: &WeatherSnapshot, deadline: Duration) -> AssistantResult<FinalAnswer> {
    let messages = build_answer_messages(get_weather_answer_directive(&runtime.config), query, snapshot);

    let llm = runtime.llm.clone();
    let choices = race_deadline(deadline, async move { llm.chat(messages).await }).await?;

    let reply = choices.into_iter().next().ok_or(AssistantError::EmptyResponse)?;
    debug!("Composed reply has {} characters", reply.len());

    Ok(FinalAnswer::new(reply.trim()))
}

/// The directive, then the weather sentence, both as system turns; then the user's question.
pub fn build_answer_messages(directive: &str, query: &UserQuery, snapshot: &WeatherSnapshot) -> Vec<ChatMessage> {
    vec![ChatMessage::system(directive), ChatMessage::system(snapshot.sentence()), ChatMessage::user(query.as_str())]
}
