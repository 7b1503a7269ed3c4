//! The question-answering pipeline.
//!
//! [`question`] reads the question. It then flows strictly through three stages:
//! - [`extract_city`] asks the LLM for the city, quoted.
//! - [`fetch_weather`] gets a validated snapshot for that city.
//! - [`compose_answer`] asks the LLM to phrase an answer from the snapshot.
//!
//! [`ask`] runs them in order and stops at the first failure. The two LLM
//! stages race their call against a deadline (see [`deadline`]).

pub mod ask;
pub mod compose_answer;
pub mod deadline;
pub mod extract_city;
pub mod fetch_weather;
pub mod question;
