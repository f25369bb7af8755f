//! AI analysis over standardized reports.
//!
//! The language model is an external collaborator behind the
//! [`model::AnalysisModel`] trait. Everything in this module upholds
//! one discipline: no failure of that collaborator ever escapes —
//! every path returns a schema-conforming result, falling back to
//! deterministic canned output.

pub mod fallback;
pub mod model;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

pub use model::AnalysisModel;
pub use orchestrator::AnalysisOrchestrator;

use thiserror::Error;

/// Internal error taxonomy. Never crosses the orchestrator boundary.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Model call failed: {0}")]
    ModelFailed(String),

    #[error("Model call timed out")]
    Timeout,

    #[error("No JSON found in model response")]
    NoJson,

    #[error("Model JSON failed to parse: {0}")]
    JsonParsing(String),

    #[error("Model response missing required field: {0}")]
    MissingField(&'static str),
}
