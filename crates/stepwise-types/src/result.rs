//! Result records produced by a run, shaped for direct JSON reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a step or scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub id: String,
    pub text: String,
    /// Resolved step kind (`Given`/`When`/`Then`).
    pub keyword: String,
    pub status: Status,
    /// Elapsed milliseconds.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One scenario's outcome.
///
/// Built incrementally by the runner: [`TestResult::start`] at scenario
/// start, [`TestResult::push_step`] per executed step, then
/// [`TestResult::finish`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub feature: String,
    pub scenario: String,
    pub steps: Vec<StepResult>,
    pub status: Status,
    /// Elapsed milliseconds.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    /// Open a result for a scenario that is about to run.
    pub fn start(feature: impl Into<String>, scenario: impl Into<String>) -> Self {
        let feature = feature.into();
        let scenario = scenario.into();
        Self {
            id: format!("{feature}-{scenario}"),
            timestamp: Utc::now(),
            feature,
            scenario,
            steps: Vec::new(),
            status: Status::Skipped,
            duration: 0,
            error: None,
        }
    }

    /// Id the next pushed step will carry (1-based step index).
    pub fn next_step_id(&self) -> String {
        format!("{}-{}", self.id, self.steps.len() + 1)
    }

    /// Append a step result. The first failure's message becomes the
    /// scenario error.
    pub fn push_step(&mut self, step: StepResult) {
        if step.status == Status::Failed && self.error.is_none() {
            self.error = step.error.clone();
        }
        self.steps.push(step);
    }

    /// Close the result, deriving the scenario status from its steps.
    pub fn finish(mut self, duration: u64) -> Self {
        self.duration = duration;
        self.status = if self.steps.iter().any(|s| s.status == Status::Failed) {
            Status::Failed
        } else if self.steps.iter().all(|s| s.status == Status::Skipped) {
            Status::Skipped
        } else {
            Status::Passed
        };
        self
    }

    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Passed => write!(f, "  ✓ {} › {}", self.feature, self.scenario),
            Status::Skipped => write!(f, "  - {} › {}", self.feature, self.scenario),
            Status::Failed => write!(
                f,
                "  ✗ {} › {} — {}",
                self.feature,
                self.scenario,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
