//! stepwise runner as a WASM module for browser environments.
//!
//! This crate exposes the run pipeline with the built-in API steps via
//! `wasm-bindgen`. Requests go out through the browser's `fetch`.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run_features } from 'stepwise-wasm';
//!
//! await init();
//!
//! const features = { "users.feature": "Scenario: ok\n  When I send a GET request to \"/ping\"" };
//! const results = JSON.parse(await run_features(JSON.stringify(features), "API_URL=http://localhost:3000"));
//! // [{ id: "users.feature-ok", status: "passed", steps: [...], ... }]
//! ```

use std::collections::BTreeMap;
use stepwise_runner::{ApiSteps, Environment, StepRegistry, StepSource};
use wasm_bindgen::prelude::*;

/// Run feature files against the API named in the environment.
///
/// `features_json` is a JSON object mapping feature name to feature text;
/// features run in name order. `environment` is `KEY=VALUE` text.
///
/// Resolves to a JSON array of test results, or `{"error": "..."}` when
/// the run could not start.
#[wasm_bindgen]
pub async fn run_features(features_json: String, environment: String) -> String {
    run_json(&features_json, &environment).await
}

/// [`run_features`] without the JS boundary.
pub async fn run_json(features_json: &str, environment: &str) -> String {
    let features: BTreeMap<String, String> = match serde_json::from_str(features_json) {
        Ok(features) => features,
        Err(e) => return error_json(format!("invalid features JSON: {e}")),
    };
    match stepwise_runner::run(&features, Environment::parse(environment), &ApiSteps).await {
        Ok(results) => serde_json::to_string(&results)
            .unwrap_or_else(|e| error_json(format!("Serialization error: {e}"))),
        Err(e) => error_json(e.to_string()),
    }
}

/// Return the runner version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Return the built-in step definitions as JSON, for editor tooling.
///
/// `[{"kind": "Given", "pattern": "I set header {string} to {string}"}, ...]`
#[wasm_bindgen]
pub fn step_table() -> String {
    let mut registry = StepRegistry::new();
    if let Err(e) = ApiSteps.register(&mut registry) {
        return error_json(e.to_string());
    }
    let table: Vec<_> = registry
        .definitions()
        .iter()
        .map(|d| serde_json::json!({ "kind": d.kind, "pattern": d.pattern.source() }))
        .collect();
    serde_json::Value::Array(table).to_string()
}

fn error_json(message: String) -> String {
    serde_json::json!({ "error": message }).to_string()
}
