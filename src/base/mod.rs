//! Core components, types, and utilities for the weather assistant.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - System prompts and directives for LLM interactions.
//! - The error taxonomy shared by every pipeline stage.
//! - Domain types and result handling.

pub mod config;
pub mod error;
pub mod prompts;
pub mod types;
