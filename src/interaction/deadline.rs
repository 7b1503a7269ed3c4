//! Deadline race around a single LLM call.

use std::{future::Future, time::Duration};

use tokio::time::timeout;
use tracing::{Instrument, instrument, warn};

use crate::base::{
    error::{AssistantError, AssistantResult},
    types::Res,
};

/// Run `call` as its own task and wait for it, or for `deadline`, whichever comes first.
///
/// On timeout the task is detached rather than aborted: it may still finish,
/// but nothing reads its result.
#[instrument(skip_all)]
pub async fn race_deadline<F, T>(deadline: Duration, call: F) -> AssistantResult<T>
where
    F: Future<Output = Res<T>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(call.in_current_span());

    match timeout(deadline, handle).await {
        Ok(Ok(result)) => result.map_err(AssistantError::LlmService),
        Ok(Err(join_err)) => Err(AssistantError::LlmService(anyhow::anyhow!("LLM task failed: {join_err}"))),
        Err(_) => {
            warn!("LLM call did not complete within {deadline:?}");
            Err(AssistantError::Timeout)
        }
    }
}
