//! Shared types for stepwise.
//!
//! This crate defines the parsed feature nodes, source file handling,
//! and the result records used across all pipeline stages.

mod result;
mod source;
pub mod ast;

pub use ast::{DataTable, Keyword, Scenario, Step, StepKind};
pub use result::{Status, StepResult, TestResult};
pub use source::SourceFile;
