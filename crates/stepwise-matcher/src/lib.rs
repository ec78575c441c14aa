//! stepwise matcher: step patterns, the step registry, and the arguments
//! a matched step is called with.

mod args;
mod error;
mod pattern;
mod registry;

pub use args::{Arg, StepArgs};
pub use error::{ArgError, PatternError};
pub use pattern::{CompiledPattern, ParamKind, StringMode};
pub use registry::{BoxError, StepDefinition, StepFn, StepMatch, StepOutcome, StepRegistry};

/// Re-exported so step implementations can name their return type.
pub use futures::future::LocalBoxFuture;
