//! In-memory `HttpClient` for tests.
//!
//! Serves canned responses keyed by URL and records every call so tests
//! can assert the exact URL, query parameters, and body a façade produced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpClient;

/// One call observed by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get {
        url: String,
        params: Vec<(String, String)>,
    },
    Post {
        url: String,
        body: Option<Value>,
    },
    GetBytes {
        url: String,
    },
}

impl RecordedCall {
    pub fn url(&self) -> &str {
        match self {
            RecordedCall::Get { url, .. }
            | RecordedCall::Post { url, .. }
            | RecordedCall::GetBytes { url } => url,
        }
    }
}

/// Fixture-backed client. URLs without a fixture answer with a 404 `ApiError`.
#[derive(Default)]
pub struct RecordingClient {
    json: HashMap<String, Value>,
    bytes: HashMap<String, Bytes>,
    failure: Option<ApiError>,
    calls: Mutex<Vec<RecordedCall>>,
    closes: AtomicUsize,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for GET or POST on `url` (query parameters excluded).
    pub fn with_json(mut self, url: impl Into<String>, value: Value) -> Self {
        self.json.insert(url.into(), value);
        self
    }

    /// Serve `bytes` for `get_bytes(url)`.
    pub fn with_bytes(mut self, url: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        self.bytes.insert(url.into(), bytes.into());
        self
    }

    /// Fail every call with `err`.
    pub fn failing_with(mut self, err: ApiError) -> Self {
        self.failure = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    fn missing(url: &str) -> ApiError {
        ApiError::http(Some(404), format!("404 Not Found from {url}"))
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        self.record(RecordedCall::Get {
            url: url.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.json.get(url).cloned().ok_or_else(|| Self::missing(url))
    }

    async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.record(RecordedCall::Post {
            url: url.to_string(),
            body: body.cloned(),
        });
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.json.get(url).cloned().ok_or_else(|| Self::missing(url))
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, ApiError> {
        self.record(RecordedCall::GetBytes {
            url: url.to_string(),
        });
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.bytes.get(url).cloned().ok_or_else(|| Self::missing(url))
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
