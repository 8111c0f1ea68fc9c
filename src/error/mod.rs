//! Error handling module for the typeahead engine.
//!
//! This module provides error handling for the completion pipeline with:
//! - A single top-level error type wrapping more specific kinds
//! - Structured reporting of host-supplied strategy function failures
//! - A crate-wide `Result` alias
//!
//! Strategy function failures are deliberately never masked into empty
//! result sets; they propagate to the caller so authoring bugs in
//! strategies stay diagnosable.

pub mod kinds;

// Re-export commonly used types
pub use kinds::{BoxError, ConfigError, Result, StrategyError, TypeaheadError};
