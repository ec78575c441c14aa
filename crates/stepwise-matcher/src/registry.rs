//! Step registry: ordered step definitions and first-match lookup.
//!
//! Definitions are registered as precompiled functions. Each one receives
//! the run's world explicitly as its first parameter, followed by the
//! step's [`StepArgs`].

use crate::args::{Arg, StepArgs};
use crate::error::PatternError;
use crate::pattern::{CompiledPattern, StringMode};
use futures::future::LocalBoxFuture;
use stepwise_types::StepKind;

/// Error type a step implementation may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What every step implementation resolves to.
pub type StepOutcome = Result<(), BoxError>;

/// A registered step implementation.
///
/// The returned future borrows the world for as long as the step runs.
pub type StepFn<W> = Box<dyn for<'w> Fn(&'w mut W, StepArgs) -> LocalBoxFuture<'w, StepOutcome>>;

/// One pattern-to-implementation mapping.
pub struct StepDefinition<W> {
    pub kind: StepKind,
    pub pattern: CompiledPattern,
    implementation: StepFn<W>,
}

impl<W> StepDefinition<W> {
    /// Invoke the implementation.
    pub fn call<'w>(&self, world: &'w mut W, args: StepArgs) -> LocalBoxFuture<'w, StepOutcome> {
        (self.implementation)(world, args)
    }
}

impl<W> std::fmt::Debug for StepDefinition<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.source())
            .finish()
    }
}

/// A successful lookup: the definition plus its coerced captures.
#[derive(Debug)]
pub struct StepMatch<'r, W> {
    pub definition: &'r StepDefinition<W>,
    pub params: Vec<Arg>,
}

/// Ordered collection of step definitions.
///
/// Registration order is match priority: the first definition of the
/// step's kind whose pattern matches the full step text wins.
pub struct StepRegistry<W> {
    definitions: Vec<StepDefinition<W>>,
    mode: StringMode,
}

impl<W> StepRegistry<W> {
    /// Create an empty registry with lenient `{string}` matching.
    pub fn new() -> Self {
        Self::with_string_mode(StringMode::default())
    }

    /// Create an empty registry with the given `{string}` matching mode.
    pub fn with_string_mode(mode: StringMode) -> Self {
        Self {
            definitions: Vec::new(),
            mode,
        }
    }

    /// Register a definition. The pattern is compiled immediately.
    pub fn register<F>(&mut self, kind: StepKind, pattern: &str, f: F) -> Result<(), PatternError>
    where
        F: for<'w> Fn(&'w mut W, StepArgs) -> LocalBoxFuture<'w, StepOutcome> + 'static,
    {
        let pattern = CompiledPattern::compile(pattern, self.mode)?;
        tracing::debug!(%kind, pattern = pattern.source(), "registered step");
        self.definitions.push(StepDefinition {
            kind,
            pattern,
            implementation: Box::new(f),
        });
        Ok(())
    }

    pub fn given<F>(&mut self, pattern: &str, f: F) -> Result<(), PatternError>
    where
        F: for<'w> Fn(&'w mut W, StepArgs) -> LocalBoxFuture<'w, StepOutcome> + 'static,
    {
        self.register(StepKind::Given, pattern, f)
    }

    pub fn when<F>(&mut self, pattern: &str, f: F) -> Result<(), PatternError>
    where
        F: for<'w> Fn(&'w mut W, StepArgs) -> LocalBoxFuture<'w, StepOutcome> + 'static,
    {
        self.register(StepKind::When, pattern, f)
    }

    pub fn then<F>(&mut self, pattern: &str, f: F) -> Result<(), PatternError>
    where
        F: for<'w> Fn(&'w mut W, StepArgs) -> LocalBoxFuture<'w, StepOutcome> + 'static,
    {
        self.register(StepKind::Then, pattern, f)
    }

    /// Find the first definition of `kind` matching `text` in full.
    pub fn find(&self, kind: StepKind, text: &str) -> Option<StepMatch<'_, W>> {
        self.definitions
            .iter()
            .filter(|d| d.kind == kind)
            .find_map(|definition| {
                let params = definition.pattern.captures(text)?;
                Some(StepMatch { definition, params })
            })
    }

    pub fn definitions(&self) -> &[StepDefinition<W>] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<W> Default for StepRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}
