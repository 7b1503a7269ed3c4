//! City extraction: ask the LLM which city the question is about.

use std::{sync::OnceLock, time::Duration};

use regex::Regex;
use tracing::{debug, instrument};

use super::deadline::race_deadline;
use crate::{
    base::{
        error::{AssistantError, AssistantResult},
        prompts::get_city_extraction_directive,
        types::{ChatMessage, UserQuery},
    },
    runtime::Runtime,
};

// Statics.

static QUOTED: OnceLock<Regex> = OnceLock::new();

/// Matches the first run of non-quote text enclosed in double quotes.
fn get_quoted_regex() -> &'static Regex {
    QUOTED.get_or_init(|| Regex::new(r#"(?i)"([^"]+)""#).expect("static regex is valid"))
}

/// Ask the LLM for the city named in `query`, racing the call against `deadline`.
///
/// Returns the trimmed text of the first quoted substring in the reply. That
/// text may be empty; deciding what an empty city means is up to the caller.
#[instrument(skip_all)]
pub async fn extract_city(runtime: &Runtime, query: &UserQuery, deadline: Duration) -> AssistantResult<String> {
    let messages = vec![ChatMessage::system(get_city_extraction_directive(&runtime.config)), ChatMessage::user(query.as_str())];

    let llm = runtime.llm.clone();
    let choices = race_deadline(deadline, async move { llm.chat(messages).await }).await?;

    let reply = choices.into_iter().next().ok_or(AssistantError::EmptyResponse)?;
    debug!("City extraction reply: {reply}");

    parse_quoted_city(&reply)
}

/// Pull the first quoted substring out of a model reply, trimmed.
pub fn parse_quoted_city(reply: &str) -> AssistantResult<String> {
    get_quoted_regex()
        .captures(reply.trim())
        .and_then(|captures| captures.get(1))
        .map(|city| city.as_str().trim().to_string())
        .ok_or(AssistantError::ExtractionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_city_in_sentence() {
        assert_eq!(parse_quoted_city(r#"The city is "Paris"."#).unwrap(), "Paris");
    }

    #[test]
    fn test_first_quoted_substring_wins() {
        assert_eq!(parse_quoted_city(r#"Either "Lyon" or "Marseille"."#).unwrap(), "Lyon");
    }

    #[test]
    fn test_quoted_content_is_trimmed_but_preserved() {
        assert_eq!(parse_quoted_city("  CITY: \"  São Paulo \"  \n").unwrap(), "São Paulo");
        assert_eq!(parse_quoted_city(r#""new york""#).unwrap(), "new york");
    }

    #[test]
    fn test_surrounding_casing_is_irrelevant() {
        assert_eq!(parse_quoted_city(r#"THE CITY IS "Berlin""#).unwrap(), "Berlin");
        assert_eq!(parse_quoted_city(r#"the city is "Berlin""#).unwrap(), "Berlin");
    }

    #[test]
    fn test_whitespace_only_quotes_yield_empty_city() {
        assert_eq!(parse_quoted_city(r#"The city is "   "."#).unwrap(), "");
    }

    #[test]
    fn test_no_quotes_fails() {
        assert!(matches!(parse_quoted_city("I'm not sure which city you mean."), Err(AssistantError::ExtractionFailed)));
    }

    #[test]
    fn test_unbalanced_or_empty_quotes_fail() {
        assert!(matches!(parse_quoted_city(r#"The city is "Paris"#), Err(AssistantError::ExtractionFailed)));
        assert!(matches!(parse_quoted_city(r#"The city is """#), Err(AssistantError::ExtractionFailed)));
    }
}
