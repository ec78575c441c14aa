//! stepwise runner: executes feature files against a live HTTP target.
//!
//! [`run`] is the entry point. It builds a step registry from a
//! [`StepSource`], creates one [`World`] for the whole run, and runs every
//! scenario of every feature in order, returning one [`TestResult`] per
//! scenario.
//!
//! Step failures never abort a run; they are recorded in the results.
//! Only a failing step source does, as [`RunError::Setup`].

mod config;
mod error;
mod report;
mod runner;
mod steps;
mod world;

pub use config::{Environment, BASE_URL_KEYS};
pub use error::{RunError, SetupError, StepError};
pub use report::RunSummary;
pub use runner::Runner;
pub use steps::{ApiSteps, StepSource};
pub use world::{Response, World};

pub use reqwest::Method;
pub use stepwise_matcher::{StepArgs, StepOutcome, StepRegistry};
pub use stepwise_types::{Status, StepResult, TestResult};

/// Run features in iteration order and collect their results.
pub async fn run<I, N, T, S>(
    features: I,
    environment: Environment,
    source: &S,
) -> Result<Vec<TestResult>, RunError>
where
    I: IntoIterator<Item = (N, T)>,
    N: AsRef<str>,
    T: AsRef<str>,
    S: StepSource + ?Sized,
{
    let mut registry = StepRegistry::new();
    source.register(&mut registry).map_err(|e| {
        tracing::error!(error = %e, "step registration failed");
        e
    })?;
    let world = World::new(environment)?;
    tracing::info!(
        definitions = registry.len(),
        base_url = world.base_url(),
        "starting run"
    );

    let mut runner = Runner::new(world, registry);
    for (name, text) in features {
        runner.run_feature(name.as_ref(), text.as_ref()).await;
    }

    let results = runner.finish();
    tracing::info!(summary = %RunSummary::from_results(&results), "run finished");
    Ok(results)
}
