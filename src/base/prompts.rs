//! Prompt templates for LLM usage.

use crate::base::config::Config;

/// Directive for the city extraction agent.
pub const CITY_EXTRACTION_DIRECTIVE: &str = "You are a weather assistant. Please extract only the city name in the following sentence and make sure the city is within quotes.";

/// Directive for the answer agent; the weather sentence follows as a second system message.
pub const WEATHER_ANSWER_DIRECTIVE: &str = "You are a weather assistant. Use the following weather information to answer the user's question.";

/// Get the city extraction directive, honoring any configured override.
pub fn get_city_extraction_directive(config: &Config) -> &str {
    if config.city_extraction_directive.trim().is_empty() {
        CITY_EXTRACTION_DIRECTIVE
    } else {
        config.city_extraction_directive.as_str()
    }
}

/// Get the weather answer directive, honoring any configured override.
pub fn get_weather_answer_directive(config: &Config) -> &str {
    if config.weather_answer_directive.trim().is_empty() {
        WEATHER_ANSWER_DIRECTIVE
    } else {
        config.weather_answer_directive.as_str()
    }
}
