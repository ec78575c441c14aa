//! End-to-end runner tests against the local stub.
//!
//! Covers: the built-in API steps, fail-fast, unmatched steps, result ids
//! and ordering, world persistence across scenarios, custom step sources,
//! setup failures, and determinism.

mod common;

use std::collections::BTreeMap;
use stepwise_runner::{
    run, ApiSteps, Environment, Runner, RunError, RunSummary, SetupError, Status, StepRegistry,
    TestResult, World,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

async fn env() -> Environment {
    let base = common::spawn_stub().await;
    Environment::parse(&format!("API_URL={base}"))
}

async fn run_one(feature: &str) -> Vec<TestResult> {
    run([("api", feature)], env().await, &ApiSteps).await.unwrap()
}

fn statuses(result: &TestResult) -> Vec<Status> {
    result.steps.iter().map(|s| s.status).collect()
}

// ──────────────────────────────────────────────────────────────────────────────
// Built-in steps
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ping_scenario_passes() {
    let results = run_one(
        "Scenario: ok\n  When I send a GET request to \"/ping\"\n  Then the response status code should be 200",
    )
    .await;
    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert_eq!(r.status, Status::Passed);
    assert_eq!(r.id, "api-ok");
    assert_eq!(r.feature, "api");
    assert_eq!(r.scenario, "ok");
    assert_eq!(statuses(r), vec![Status::Passed, Status::Passed]);
    assert_eq!(r.steps[0].id, "api-ok-1");
    assert_eq!(r.steps[1].id, "api-ok-2");
    assert_eq!(r.steps[0].keyword, "When");
    assert_eq!(r.steps[1].keyword, "Then");
    assert!(r.error.is_none());
}

#[tokio::test]
async fn test_data_table_and_field_steps() {
    let feature = r#"Feature: Users

  Scenario: Read a user
    When I send a GET request to "/users/1"
    Then the response status code should be 200
    And the response should have the following data:
      | name   | Ada   |
      | role   | admin |
      | id     | 1     |
      | active | true  |
    And the response should contain "name" with value "Ada"
    And the response should contain "role"
    And the response header "X-Request-Id" should be "stub"
"#;
    let results = run_one(feature).await;
    assert_eq!(results[0].status, Status::Passed, "{:?}", results[0].error);
    assert_eq!(results[0].steps.len(), 6);
}

#[tokio::test]
async fn test_doc_string_post() {
    let feature = r#"Scenario: Create
  When I send a POST request to "/users" with:
    """
    {
      "name": "Grace",
      "role": "user"
    }
    """
  Then the response status code should be 201
  And the response should contain "name" with value "Grace"
"#;
    let results = run_one(feature).await;
    assert_eq!(results[0].status, Status::Passed, "{:?}", results[0].error);
}

#[tokio::test]
async fn test_put_patch_delete_and_any_method() {
    let feature = r#"Scenario: Lifecycle
  When I send a PUT request to "/users/1" with:
    """
    {"name": "Ada L."}
    """
  Then the response should contain "name" with value "Ada L."
  When I send a PATCH request to "/users/1" with:
    """
    {"role": "owner"}
    """
  Then the response should contain "role" with value "owner"
  When I send a DELETE request to "/users/1"
  Then the response status code should be 204
  When I send a get request to "/ping"
  Then the response status code should be 200
"#;
    let results = run_one(feature).await;
    assert_eq!(results[0].status, Status::Passed, "{:?}", results[0].error);
    assert_eq!(results[0].steps.len(), 8);
}

#[tokio::test]
async fn test_headers_persist_into_requests() {
    let feature = r#"Scenario: Auth
  Given I set header "X-Api-Key" to "secret"
  When I send a GET request to "/whoami"
  Then the response should contain "api_key" with value "secret"
"#;
    let results = run_one(feature).await;
    assert_eq!(results[0].status, Status::Passed, "{:?}", results[0].error);
    assert_eq!(results[0].steps[0].keyword, "Given");
}

#[tokio::test]
async fn test_error_status_is_assertable() {
    let feature = "Scenario: missing\n  When I send a GET request to \"/nope\"\n  Then the response status code should be 404\n";
    let results = run_one(feature).await;
    assert_eq!(results[0].status, Status::Passed);
}

// ──────────────────────────────────────────────────────────────────────────────
// Failures
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fail_fast_drops_remaining_steps() {
    let feature = r#"Scenario: broken
  When I send a GET request to "/ping"
  Then the response status code should be 500
  And the response should contain "ok"
"#;
    let results = run_one(feature).await;
    let r = &results[0];
    assert_eq!(r.status, Status::Failed);
    assert_eq!(statuses(r), vec![Status::Passed, Status::Failed]);
    assert_eq!(
        r.steps[1].error.as_deref(),
        Some("Expected status code 500 but got 200")
    );
    assert_eq!(r.error, r.steps[1].error);
}

#[tokio::test]
async fn test_unmatched_step_fails() {
    let results = run_one("Scenario: x\n  Given something nobody defined\n").await;
    let r = &results[0];
    assert_eq!(r.status, Status::Failed);
    assert_eq!(r.steps.len(), 1);
    assert_eq!(
        r.steps[0].error.as_deref(),
        Some("No matching step definition found for: Given something nobody defined")
    );
}

#[tokio::test]
async fn test_kind_mismatch_is_unmatched() {
    let results = run_one("Scenario: x\n  Given the response status code should be 200\n").await;
    let error = results[0].steps[0].error.as_deref().unwrap();
    assert!(error.contains("No matching step definition found for:"));
}

#[tokio::test]
async fn test_assertion_before_request() {
    let results = run_one("Scenario: x\n  Then the response status code should be 200\n").await;
    assert_eq!(results[0].steps[0].error.as_deref(), Some("No response received"));
}

#[tokio::test]
async fn test_missing_field_message() {
    let feature = r#"Scenario: x
  When I send a GET request to "/users/1"
  Then the response should have the following data:
    | email | ada@example.com |
"#;
    let results = run_one(feature).await;
    assert_eq!(
        results[0].steps[1].error.as_deref(),
        Some("Expected email to be ada@example.com but got undefined")
    );
}

#[tokio::test]
async fn test_invalid_json_body_fails_step() {
    let feature = "Scenario: x\n  When I send a POST request to \"/users\" with:\n    \"\"\"\n    not json\n    \"\"\"\n";
    let results = run_one(feature).await;
    let error = results[0].steps[0].error.as_deref().unwrap();
    assert!(error.starts_with("Invalid JSON body"), "{error}");
}

#[tokio::test]
async fn test_transport_error_fails_step_not_run() {
    let base = common::closed_url().await;
    let feature = "Scenario: down\n  When I send a GET request to \"/ping\"\n";
    let results = run(
        [("api", feature)],
        Environment::parse(&format!("API_URL={base}")),
        &ApiSteps,
    )
    .await
    .unwrap();
    assert_eq!(results[0].status, Status::Failed);
    assert!(results[0].steps[0]
        .error
        .as_deref()
        .unwrap()
        .starts_with("Request failed"));
}

#[tokio::test]
async fn test_panicking_step_is_contained() {
    let source = |r: &mut StepRegistry<World>| -> Result<(), SetupError> {
        r.given("it explodes with {word}", |_, args| {
            Box::pin(async move {
                let reason = args.str(0)?;
                if !reason.is_empty() {
                    panic!("{reason}");
                }
                Ok(())
            })
        })?;
        r.given("it is fine", |_, _| Box::pin(async { Ok(()) }))?;
        Ok(())
    };
    let features = [
        ("a", "Scenario: boom\n  Given it explodes with kaboom\n"),
        ("b", "Scenario: fine\n  Given it is fine\n"),
    ];
    let results = run(features, Environment::new(), &source).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].steps[0].error.as_deref(),
        Some("Step panicked: kaboom")
    );
    assert_eq!(results[1].status, Status::Passed);
}

#[tokio::test]
async fn test_panic_before_future_is_contained() {
    let source = |r: &mut StepRegistry<World>| -> Result<(), SetupError> {
        r.given("it needs an int {word}", |_, args| {
            let n = args.int(0).unwrap();
            Box::pin(async move {
                let _ = n;
                Ok(())
            })
        })?;
        r.given("it is fine", |_, _| Box::pin(async { Ok(()) }))?;
        Ok(())
    };
    let features = [
        ("a", "Scenario: eager
  Given it needs an int abc
  Given it is fine
"),
        ("b", "Scenario: fine
  Given it is fine
"),
    ];
    let results = run(features, Environment::new(), &source).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, Status::Failed);
    assert_eq!(results[0].steps.len(), 1);
    let error = results[0].steps[0].error.as_deref().unwrap();
    assert!(error.starts_with("Step panicked:"), "{error}");
    assert!(error.contains("WrongKind"), "{error}");
    assert_eq!(results[1].status, Status::Passed);
}

// ──────────────────────────────────────────────────────────────────────────────
// Structure and ordering
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scenario_without_steps_is_skipped() {
    let results = run_one("Scenario: empty\nScenario: also empty\n").await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == Status::Skipped));
    assert!(results.iter().all(|r| r.steps.is_empty()));
}

#[tokio::test]
async fn test_features_run_in_iteration_order() {
    let mut features = BTreeMap::new();
    features.insert("b-orders", "Scenario: one\n  When I send a GET request to \"/ping\"\n");
    features.insert(
        "a-users",
        "Scenario: two\n  When I send a GET request to \"/ping\"\nScenario: three\n",
    );
    let results = run(&features, env().await, &ApiSteps).await.unwrap();
    let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a-users-two", "a-users-three", "b-orders-one"]);
}

#[tokio::test]
async fn test_world_persists_across_scenarios() {
    let feature = r#"Scenario: request
  When I send a GET request to "/users/1"
Scenario: assert later
  Then the response status code should be 200
"#;
    let results = run_one(feature).await;
    assert!(results.iter().all(|r| r.status == Status::Passed));
}

#[tokio::test]
async fn test_failure_does_not_stop_later_scenarios() {
    let feature = r#"Scenario: bad
  Then the response status code should be 200
Scenario: good
  When I send a GET request to "/ping"
  Then the response status code should be 200
"#;
    let results = run_one(feature).await;
    assert_eq!(results[0].status, Status::Failed);
    assert_eq!(results[1].status, Status::Passed);
    let summary = RunSummary::from_results(&results);
    assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 0));
}

#[tokio::test]
async fn test_runner_directly() {
    let mut registry = StepRegistry::new();
    stepwise_runner::StepSource::register(&ApiSteps, &mut registry).unwrap();
    let world = World::new(env().await).unwrap();
    let mut runner = Runner::new(world, registry);

    runner
        .run_feature("f", "Scenario: s\n  When I send a GET request to \"/ping\"\n")
        .await;
    assert_eq!(runner.results().len(), 1);
    assert_eq!(runner.world().response().unwrap().status, 200);

    let results = runner.finish();
    assert_eq!(results[0].id, "f-s");
}

#[tokio::test]
async fn test_run_scenario_returns_result_without_collecting() {
    let mut registry = StepRegistry::new();
    stepwise_runner::StepSource::register(&ApiSteps, &mut registry).unwrap();
    let mut runner = Runner::new(World::new(env().await).unwrap(), registry);

    let scenarios = stepwise_parser::parse_feature(
        "Scenario: one\n  When I send a GET request to \"/ping\"\n  Then the response status code should be 200\n",
    );
    let result = runner.run_scenario("f", &scenarios[0]).await;
    assert_eq!(result.id, "f-one");
    assert_eq!(result.status, Status::Passed);
    assert_eq!(result.steps.len(), 2);
    assert!(runner.results().is_empty());
}

#[tokio::test]
async fn test_result_json_shape() {
    let results = run_one("Scenario: ok\n  When I send a GET request to \"/ping\"\n").await;
    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["status"], "passed");
    assert_eq!(json["steps"][0]["status"], "passed");
    assert!(json.get("error").is_none());
    assert!(json["steps"][0].get("error").is_none());
    assert!(json["timestamp"].is_string());
}

// ──────────────────────────────────────────────────────────────────────────────
// Custom sources and setup
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_custom_steps_combined_with_builtins() {
    let custom = |r: &mut StepRegistry<World>| -> Result<(), SetupError> {
        r.given("the API is available", |w, _| {
            Box::pin(async move {
                w.send_request(stepwise_runner::Method::GET, "/ping", None)
                    .await?;
                Ok(())
            })
        })?;
        Ok(())
    };
    let feature = "Scenario: s\n  Given the API is available\n  Then the response status code should be 200\n";
    let results = run([("api", feature)], env().await, &(custom, ApiSteps))
        .await
        .unwrap();
    assert_eq!(results[0].status, Status::Passed, "{:?}", results[0].error);
}

#[tokio::test]
async fn test_custom_step_reads_environment() {
    let custom = |r: &mut StepRegistry<World>| -> Result<(), SetupError> {
        r.then("the token is {string}", |w, args| {
            Box::pin(async move {
                let expected = args.str(0)?;
                match w.env().get("TOKEN") {
                    Some(token) if token == expected => Ok(()),
                    other => Err(format!("token was {other:?}").into()),
                }
            })
        })?;
        Ok(())
    };
    let results = run(
        [("env", "Scenario: s\n  Then the token is \"abc\"\n")],
        Environment::parse("TOKEN=abc"),
        &custom,
    )
    .await
    .unwrap();
    assert_eq!(results[0].status, Status::Passed, "{:?}", results[0].error);
}

#[tokio::test]
async fn test_setup_error_aborts_run() {
    let failing = |_: &mut StepRegistry<World>| -> Result<(), SetupError> {
        Err(SetupError::Source("definitions unavailable".into()))
    };
    let err = run([("api", "Scenario: s\n")], Environment::new(), &failing)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Setup(SetupError::Source(_))));
    assert_eq!(err.to_string(), "setup failed: step source failed: definitions unavailable");
}

// ──────────────────────────────────────────────────────────────────────────────
// Determinism
// ──────────────────────────────────────────────────────────────────────────────

/// Results minus timing fields.
fn shape(results: &[TestResult]) -> Vec<(String, Status, Vec<(String, Status, Option<String>)>)> {
    results
        .iter()
        .map(|r| {
            let steps = r
                .steps
                .iter()
                .map(|s| (s.id.clone(), s.status, s.error.clone()))
                .collect();
            (r.id.clone(), r.status, steps)
        })
        .collect()
}

#[tokio::test]
async fn test_repeated_runs_identical() {
    let feature = r#"Scenario: a
  When I send a GET request to "/users/1"
  Then the response should contain "name" with value "Ada"
Scenario: b
  Then the response status code should be 418
  And the response should contain "name"
Scenario: c
  Given nothing matches this
"#;
    let env = env().await;
    let first = run([("api", feature)], env.clone(), &ApiSteps).await.unwrap();
    for _ in 0..10 {
        let again = run([("api", feature)], env.clone(), &ApiSteps).await.unwrap();
        assert_eq!(shape(&first), shape(&again));
    }
}
