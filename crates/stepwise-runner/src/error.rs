//! Error types for the stepwise runner.

use stepwise_matcher::{ArgError, PatternError};
use stepwise_types::StepKind;
use thiserror::Error;

/// A step failure. Its `Display` text is what lands in `StepResult.error`.
#[derive(Debug, Error)]
pub enum StepError {
    /// No registered definition of this kind matches the step text.
    #[error("No matching step definition found for: {kind} {text}")]
    NoMatch { kind: StepKind, text: String },
    /// A `Then` step ran before any request was sent.
    #[error("No response received")]
    NoResponse,
    /// Expectation not met.
    #[error("{0}")]
    Assertion(String),
    /// Argument missing or of the wrong kind.
    #[error(transparent)]
    Arg(#[from] ArgError),
    /// Connection-level failure (DNS, refused, reset). HTTP error statuses
    /// are responses, not transport errors.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A request body that is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    /// `{word}` that is not an HTTP method.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    /// A step implementation panicked.
    #[error("Step panicked: {0}")]
    Panicked(String),
}

/// Failure while populating the step registry. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid step definition: {0}")]
    Pattern(#[from] PatternError),
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("step source failed: {0}")]
    Source(String),
}

/// Run-level error: the run produced no results.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),
}
