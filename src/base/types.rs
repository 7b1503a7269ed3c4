use std::fmt;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;

/// The raw question typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery(String);

impl UserQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trimmed, non-empty city name.
///
/// The extraction stage hands back a plain candidate string, which may be empty;
/// only a candidate that survives trimming becomes an `ExtractedCity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCity(String);

impl ExtractedCity {
    /// Returns `None` when the candidate is empty after trimming.
    pub fn new(candidate: &str) -> Option<Self> {
        let trimmed = candidate.trim();

        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated current weather for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub description: String,
    pub temperature_celsius: f64,
}

impl WeatherSnapshot {
    /// Render the snapshot as the sentence handed to the answer agent.
    pub fn sentence(&self) -> String {
        format!(
            "The current weather in {} is {} with a temperature of {:.2}°C.",
            self.city_name, self.description, self.temperature_celsius
        )
    }
}

/// The composed reply shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalAnswer(String);

impl FinalAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FinalAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a single run of the pipeline ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model composed an answer.
    Answered(FinalAnswer),
    /// The model quoted a city, but the quotes held nothing but whitespace.
    NoCity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

/// A single role-tagged message sent to the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}
