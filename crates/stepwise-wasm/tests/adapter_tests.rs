//! JSON boundary tests for the WASM adapter, run natively.

use serde_json::Value;
use stepwise_wasm::{run_json, step_table, version};

#[tokio::test]
async fn test_invalid_features_json_is_error_object() {
    let out: Value = serde_json::from_str(&run_json("not json", "").await).unwrap();
    let message = out["error"].as_str().unwrap();
    assert!(message.starts_with("invalid features JSON"), "{message}");
}

#[tokio::test]
async fn test_empty_feature_map_yields_empty_array() {
    assert_eq!(run_json("{}", "API_URL=http://localhost:1").await, "[]");
}

#[tokio::test]
async fn test_results_without_requests() {
    let features = serde_json::json!({
        "b.feature": "Scenario: unmatched\n  Given nobody defined this\n",
        "a.feature": "Scenario: empty\n",
    });
    let out: Value = serde_json::from_str(&run_json(&features.to_string(), "").await).unwrap();
    let results = out.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "a.feature-empty");
    assert_eq!(results[0]["status"], "skipped");
    assert_eq!(results[1]["status"], "failed");
    assert_eq!(
        results[1]["error"],
        "No matching step definition found for: Given nobody defined this"
    );
}

#[test]
fn test_step_table_lists_builtins() {
    let table: Value = serde_json::from_str(&step_table()).unwrap();
    let rows = table.as_array().unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["kind"], "Given");
    assert_eq!(rows[0]["pattern"], "I set header {string} to {string}");
}

#[test]
fn test_version() {
    assert_eq!(version(), env!("CARGO_PKG_VERSION"));
}
