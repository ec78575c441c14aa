//! Local stub HTTP API for runner tests.
//!
//! Routes:
//! - `GET /ping` → 200 `{"ok":true}`
//! - `GET /users/1` → 200 user record
//! - `POST /users` → 201, echoes the JSON body
//! - `PUT|PATCH /users/1` → 200, echoes the JSON body
//! - `DELETE /users/1` → 204, empty body
//! - `GET /text` → 200 `text/plain`
//! - `GET /whoami` → 200 `{"api_key": <x-api-key header>}`
//! - `GET /cookies` → 200 with two `set-cookie` headers
//! - anything else → 404 `{"error":"not found"}`
//!
//! Every response carries `x-request-id: stub`.

#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use tokio::net::TcpListener;

/// Route runner logs to the test output. `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start the stub on an ephemeral port; returns its base URL.
pub async fn spawn_stub() -> String {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(handle))
                    .await;
            });
        }
    });

    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn handle(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let api_key = req
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = req
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes())
        .unwrap_or_default();
    let echo = String::from_utf8_lossy(&body).into_owned();

    let (status, content_type, text): (u16, &str, String) = match (&method, path.as_str()) {
        (&Method::GET, "/ping") => (200, "application/json", r#"{"ok":true}"#.to_string()),
        (&Method::GET, "/users/1") => (
            200,
            "application/json",
            r#"{"id":1,"name":"Ada","role":"admin","active":true}"#.to_string(),
        ),
        (&Method::POST, "/users") => (201, "application/json", echo),
        (&Method::PUT, "/users/1") | (&Method::PATCH, "/users/1") => {
            (200, "application/json", echo)
        }
        (&Method::DELETE, "/users/1") => (204, "application/json", String::new()),
        (&Method::GET, "/text") => (200, "text/plain", "pong".to_string()),
        (&Method::GET, "/whoami") => (
            200,
            "application/json",
            serde_json::json!({ "api_key": api_key }).to_string(),
        ),
        (&Method::GET, "/cookies") => (200, "application/json", "{}".to_string()),
        _ => (404, "application/json", r#"{"error":"not found"}"#.to_string()),
    };

    let mut builder = Response::builder();
    if path == "/cookies" {
        builder = builder
            .header("set-cookie", "session=abc")
            .header("set-cookie", "theme=dark");
    }

    Ok(builder
        .status(status)
        .header("content-type", content_type)
        .header("x-request-id", "stub")
        .body(Full::new(Bytes::from(text)))
        .unwrap())
}
