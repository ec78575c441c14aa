//! The world: HTTP state shared by the steps of a run.
//!
//! Holds the environment, the headers set so far, and the last response.
//! Step implementations receive it explicitly as `&mut World`.

use crate::config::Environment;
use crate::error::{SetupError, StepError};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A captured HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    /// JSON body if it parses, else the body text. An empty body is `null`.
    pub data: Value,
    /// Header names are lowercase.
    pub headers: BTreeMap<String, String>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Top-level field of a JSON object body.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Mutable per-run HTTP state.
#[derive(Debug)]
pub struct World {
    client: Client,
    env: Environment,
    headers: BTreeMap<String, String>,
    response: Option<Response>,
}

impl World {
    pub fn new(env: Environment) -> Result<Self, SetupError> {
        let client = Client::builder().build().map_err(SetupError::HttpClient)?;
        Ok(Self::with_client(env, client))
    }

    pub fn with_client(env: Environment, client: Client) -> Self {
        Self {
            client,
            env,
            headers: BTreeMap::new(),
            response: None,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn base_url(&self) -> &str {
        self.env.base_url()
    }

    /// Headers sent with every later request.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// The last response, for assertions.
    pub fn response(&self) -> Result<&Response, StepError> {
        self.response.as_ref().ok_or(StepError::NoResponse)
    }

    /// Absolute URLs pass through; anything else is appended to the base URL.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url();
        if base.ends_with('/') && path.starts_with('/') {
            format!("{}{path}", base.trim_end_matches('/'))
        } else {
            format!("{base}{path}")
        }
    }

    /// Send a request and store its response.
    ///
    /// Any HTTP status, 4xx and 5xx included, is captured as the response.
    /// Only failures that produce no response are errors.
    pub async fn send_request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<&Response, StepError> {
        let url = self.resolve_url(path);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method.clone(), &url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
            StepError::Transport(e)
        })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let text = response.text().await?;
        tracing::debug!(%method, %url, status, "received response");

        Ok(&*self.response.insert(Response {
            status,
            data: parse_body(&text),
            headers,
        }))
    }
}

/// Lowercase names; repeated headers are joined with `", "`.
fn collect_headers(map: &HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
