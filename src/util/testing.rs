//! Test support: logging setup and an in-memory Graph client

use std::collections::HashMap;
use std::env;
use std::sync::{Mutex, Once};

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::Query;
use crate::infrastructure::traits::GraphClient;
use crate::infrastructure::{InfraError, InfraResult};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["reqwest", "hyper", "mockito"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Request captured by [`FakeGraphClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
enum FakeResponse {
    Json(Value),
    Bytes(Vec<u8>),
    Empty,
    Error {
        status: u16,
        code: String,
        message: String,
    },
}

/// In-memory [`GraphClient`] answering from canned responses keyed by
/// method and path, recording every request it sees.
///
/// Requests without a canned response fail with a 404 Graph error.
#[derive(Debug, Default)]
pub struct FakeGraphClient {
    responses: Mutex<HashMap<(&'static str, String), FakeResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeGraphClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn respond(&self, method: &'static str, path: &str, response: FakeResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((method, path.to_string()), response);
        self
    }

    pub fn respond_json(&self, method: &'static str, path: &str, value: Value) -> &Self {
        self.respond(method, path, FakeResponse::Json(value))
    }

    pub fn respond_bytes(&self, method: &'static str, path: &str, bytes: &[u8]) -> &Self {
        self.respond(method, path, FakeResponse::Bytes(bytes.to_vec()))
    }

    pub fn respond_empty(&self, method: &'static str, path: &str) -> &Self {
        self.respond(method, path, FakeResponse::Empty)
    }

    pub fn respond_error(
        &self,
        method: &'static str,
        path: &str,
        status: u16,
        code: &str,
        message: &str,
    ) -> &Self {
        self.respond(
            method,
            path,
            FakeResponse::Error {
                status,
                code: code.to_string(),
                message: message.to_string(),
            },
        )
    }

    /// All requests in the order they were made.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    fn handle(
        &self,
        method: &'static str,
        path: &str,
        query: &Query,
        body: Option<Value>,
    ) -> InfraResult<FakeResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                query: query.pairs().to_vec(),
                body,
            });

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(method, path.to_string()))
            .cloned();

        match response {
            Some(FakeResponse::Error {
                status,
                code,
                message,
            }) => Err(InfraError::Graph {
                status,
                code,
                message,
            }),
            Some(other) => Ok(other),
            None => Err(InfraError::Graph {
                status: 404,
                code: "itemNotFound".into(),
                message: format!("no fake response for {} {}", method, path),
            }),
        }
    }
}

fn into_json(response: FakeResponse) -> Value {
    match response {
        FakeResponse::Json(v) => v,
        FakeResponse::Bytes(b) => Value::String(String::from_utf8_lossy(&b).into_owned()),
        FakeResponse::Empty | FakeResponse::Error { .. } => Value::Null,
    }
}

impl GraphClient for FakeGraphClient {
    fn get_json(&self, path: &str, query: &Query) -> InfraResult<Value> {
        self.handle("GET", path, query, None).map(into_json)
    }

    fn post_json(&self, path: &str, body: &Value) -> InfraResult<Option<Value>> {
        let response = self.handle("POST", path, &Query::new(), Some(body.clone()))?;
        Ok(match response {
            FakeResponse::Empty => None,
            other => Some(into_json(other)),
        })
    }

    fn patch_json(&self, path: &str, body: &Value) -> InfraResult<Value> {
        self.handle("PATCH", path, &Query::new(), Some(body.clone()))
            .map(into_json)
    }

    fn delete(&self, path: &str) -> InfraResult<()> {
        self.handle("DELETE", path, &Query::new(), None).map(|_| ())
    }

    fn get_bytes(&self, path: &str) -> InfraResult<Vec<u8>> {
        let response = self.handle("GET", path, &Query::new(), None)?;
        Ok(match response {
            FakeResponse::Bytes(b) => b,
            FakeResponse::Json(v) => v.to_string().into_bytes(),
            FakeResponse::Empty | FakeResponse::Error { .. } => Vec::new(),
        })
    }

    fn put_bytes(&self, path: &str, content_type: &str, body: Vec<u8>) -> InfraResult<Value> {
        let recorded = serde_json::json!({
            "contentType": content_type,
            "length": body.len(),
        });
        self.handle("PUT", path, &Query::new(), Some(recorded))
            .map(into_json)
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_canned_response_when_get_then_returns_and_records() {
        let fake = FakeGraphClient::new();
        fake.respond_json("GET", "/me", json!({"id": "u1"}));

        let value = fake.get_json("/me", &Query::new().top(3)).unwrap();

        assert_eq!(value["id"], "u1");
        let req = fake.last_request().unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.query_value("$top"), Some("3"));
    }

    #[test]
    fn given_no_canned_response_when_get_then_404() {
        let fake = FakeGraphClient::new();
        let err = fake.get_json("/nope", &Query::new()).unwrap_err();
        assert!(matches!(err, InfraError::Graph { status: 404, .. }));
    }
}
