//! Scenario runner: executes parsed scenarios step by step and collects
//! one [`TestResult`] per scenario.
//!
//! Steps run strictly in order. The first failing step ends its scenario;
//! the steps after it are not executed and not recorded.

use crate::error::StepError;
use crate::world::World;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use stepwise_matcher::{Arg, StepArgs, StepRegistry};
use stepwise_types::{Scenario, Status, Step, StepResult, TestResult};

pub struct Runner {
    world: World,
    registry: StepRegistry<World>,
    results: Vec<TestResult>,
}

impl Runner {
    pub fn new(world: World, registry: StepRegistry<World>) -> Self {
        Self {
            world,
            registry,
            results: Vec::new(),
        }
    }

    /// Parse one feature file and run its scenarios in source order.
    pub async fn run_feature(&mut self, feature: &str, text: &str) {
        let scenarios = stepwise_parser::parse_feature(text);
        tracing::info!(feature, scenarios = scenarios.len(), "running feature");
        for scenario in &scenarios {
            let result = self.run_scenario(feature, scenario).await;
            self.results.push(result);
        }
    }

    /// Run one scenario against the shared world.
    ///
    /// The result is returned, not collected; [`Runner::run_feature`]
    /// collects the results of the scenarios it runs.
    pub async fn run_scenario(&mut self, feature: &str, scenario: &Scenario) -> TestResult {
        let started = Utc::now();
        let mut result = TestResult::start(feature, &scenario.name);
        tracing::debug!(feature, scenario = %scenario.name, "running scenario");

        for step in &scenario.steps {
            let step_started = Utc::now();
            let outcome = self.run_step(step).await;
            let id = result.next_step_id();
            let (status, error) = match outcome {
                Ok(()) => (Status::Passed, None),
                Err(message) => (Status::Failed, Some(message)),
            };
            if let Some(message) = &error {
                tracing::warn!(
                    feature,
                    scenario = %scenario.name,
                    line = step.line,
                    error = %message,
                    "step failed"
                );
            }
            result.push_step(StepResult {
                id,
                text: step.text.clone(),
                keyword: step.kind.to_string(),
                status,
                duration: elapsed_ms(step_started),
                error,
            });
            if status == Status::Failed {
                break;
            }
        }

        let result = result.finish(elapsed_ms(started));
        tracing::info!(
            feature,
            scenario = %scenario.name,
            status = %result.status,
            duration = result.duration,
            "scenario finished"
        );
        result
    }

    /// Match and execute one step. The error is the text to record.
    async fn run_step(&mut self, step: &Step) -> Result<(), String> {
        let Some(found) = self.registry.find(step.kind, &step.text) else {
            return Err(StepError::NoMatch {
                kind: step.kind,
                text: step.text.clone(),
            }
            .to_string());
        };
        tracing::debug!(
            kind = %step.kind,
            text = %step.text,
            pattern = found.definition.pattern.source(),
            "matched step"
        );

        let mut args = StepArgs::new(found.params);
        if let Some(doc) = &step.doc_string {
            args.push(Arg::DocString(doc.trim().to_string()));
        }
        if let Some(table) = &step.data_table {
            args.push(Arg::Table(table.clone()));
        }

        // Handlers may panic before returning their future, so the call
        // itself happens inside the guarded future.
        let definition = found.definition;
        let world = &mut self.world;
        let call = async move { definition.call(world, args).await };
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(outcome) => outcome.map_err(|e| e.to_string()),
            Err(panic) => Err(StepError::Panicked(panic_message(panic.as_ref())).to_string()),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Hand back every result collected so far, in run order.
    pub fn finish(self) -> Vec<TestResult> {
        self.results
    }
}

fn elapsed_ms(since: DateTime<Utc>) -> u64 {
    u64::try_from((Utc::now() - since).num_milliseconds()).unwrap_or(0)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
