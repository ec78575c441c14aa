//! Step sources and the built-in API step library.

use crate::error::{SetupError, StepError};
use crate::world::World;
use reqwest::Method;
use serde_json::Value;
use stepwise_matcher::{StepArgs, StepOutcome, StepRegistry};

/// Something that contributes step definitions to a run.
pub trait StepSource {
    fn register(&self, registry: &mut StepRegistry<World>) -> Result<(), SetupError>;
}

impl<F> StepSource for F
where
    F: Fn(&mut StepRegistry<World>) -> Result<(), SetupError>,
{
    fn register(&self, registry: &mut StepRegistry<World>) -> Result<(), SetupError> {
        self(registry)
    }
}

/// Both sources, first one first. Earlier definitions win on overlap.
impl<A: StepSource, B: StepSource> StepSource for (A, B) {
    fn register(&self, registry: &mut StepRegistry<World>) -> Result<(), SetupError> {
        self.0.register(registry)?;
        self.1.register(registry)
    }
}

/// Steps for exercising a JSON HTTP API.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiSteps;

impl StepSource for ApiSteps {
    fn register(&self, r: &mut StepRegistry<World>) -> Result<(), SetupError> {
        r.given("I set header {string} to {string}", |w, a| {
            Box::pin(set_header(w, a))
        })?;

        r.when("I send a GET request to {string}", |w, a| {
            Box::pin(send_without_body(w, a, Method::GET))
        })?;
        r.when("I send a POST request to {string} with:", |w, a| {
            Box::pin(send_with_body(w, a, Method::POST))
        })?;
        r.when("I send a PUT request to {string} with:", |w, a| {
            Box::pin(send_with_body(w, a, Method::PUT))
        })?;
        r.when("I send a PATCH request to {string} with:", |w, a| {
            Box::pin(send_with_body(w, a, Method::PATCH))
        })?;
        r.when("I send a DELETE request to {string}", |w, a| {
            Box::pin(send_without_body(w, a, Method::DELETE))
        })?;
        r.when("I send a {word} request to {string}", |w, a| {
            Box::pin(send_any(w, a))
        })?;

        r.then("the response status code should be {int}", |w, a| {
            Box::pin(status_is(w, a))
        })?;
        r.then("the response should have the following data:", |w, a| {
            Box::pin(has_data(w, a))
        })?;
        r.then("the response should contain {string} with value {string}", |w, a| {
            Box::pin(contains_value(w, a))
        })?;
        r.then("the response should contain {string}", |w, a| {
            Box::pin(contains_field(w, a))
        })?;
        r.then("the response header {string} should be {string}", |w, a| {
            Box::pin(header_is(w, a))
        })?;
        Ok(())
    }
}

// ── Given ──────────────────────────────────────────────────────────────

async fn set_header(world: &mut World, args: StepArgs) -> StepOutcome {
    world.set_header(args.str(0)?, args.str(1)?);
    Ok(())
}

// ── When ───────────────────────────────────────────────────────────────

async fn send_without_body(world: &mut World, args: StepArgs, method: Method) -> StepOutcome {
    world.send_request(method, args.str(0)?, None).await?;
    Ok(())
}

async fn send_with_body(world: &mut World, args: StepArgs, method: Method) -> StepOutcome {
    let body: Value = serde_json::from_str(args.doc_string()?).map_err(StepError::Json)?;
    world.send_request(method, args.str(0)?, Some(body)).await?;
    Ok(())
}

async fn send_any(world: &mut World, args: StepArgs) -> StepOutcome {
    let word = args.str(0)?;
    let method = Method::from_bytes(word.to_ascii_uppercase().as_bytes())
        .map_err(|_| StepError::InvalidMethod(word.to_string()))?;
    world.send_request(method, args.str(1)?, None).await?;
    Ok(())
}

// ── Then ───────────────────────────────────────────────────────────────

async fn status_is(world: &mut World, args: StepArgs) -> StepOutcome {
    let expected = args.int(0)?;
    let actual = world.response()?.status;
    if i64::from(actual) != expected {
        return Err(StepError::Assertion(format!(
            "Expected status code {expected} but got {actual}"
        ))
        .into());
    }
    Ok(())
}

async fn has_data(world: &mut World, args: StepArgs) -> StepOutcome {
    let response = world.response()?;
    for (key, expected) in args.table()?.rows_hash() {
        field_is(&response.data, &key, &expected)?;
    }
    Ok(())
}

async fn contains_value(world: &mut World, args: StepArgs) -> StepOutcome {
    field_is(&world.response()?.data, args.str(0)?, args.str(1)?)?;
    Ok(())
}

async fn contains_field(world: &mut World, args: StepArgs) -> StepOutcome {
    let key = args.str(0)?;
    if world.response()?.field(key).is_none() {
        return Err(StepError::Assertion(format!("Expected response to contain {key}")).into());
    }
    Ok(())
}

async fn header_is(world: &mut World, args: StepArgs) -> StepOutcome {
    let (name, expected) = (args.str(0)?, args.str(1)?);
    match world.response()?.header(name) {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(StepError::Assertion(format!(
            "Expected header {name} to be {expected} but got {}",
            actual.unwrap_or("undefined")
        ))
        .into()),
    }
}

/// Compare a top-level field against its expected text form.
fn field_is(data: &Value, key: &str, expected: &str) -> Result<(), StepError> {
    let actual = data.get(key);
    if actual.map(render).as_deref() == Some(expected) {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "Expected {key} to be {expected} but got {}",
        actual.map(render).unwrap_or_else(|| "undefined".to_string())
    )))
}

/// Strings as their text, everything else as JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
