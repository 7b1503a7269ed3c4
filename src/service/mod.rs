//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services the weather assistant calls:
//! - LLM services (e.g., Mistral through its OpenAI-compatible API)
//! - Weather services (e.g., OpenWeatherMap)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod llm;
pub mod weather;
