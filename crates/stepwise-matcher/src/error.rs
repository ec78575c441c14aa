//! Error types for pattern compilation and argument access.

use thiserror::Error;

/// A step pattern that could not be turned into a matcher.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid step pattern `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A step implementation read an argument that is missing or of another kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("step argument {index} is missing")]
    Missing { index: usize },
    #[error("step argument {index} is {found}, expected {expected}")]
    WrongKind {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("step has no doc string")]
    NoDocString,
    #[error("step has no data table")]
    NoDataTable,
}
