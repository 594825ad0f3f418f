//! HTTP client wrapper.
//!
//! `HttpClient` is the seam façades talk to. `ReqwestClient` is the
//! production implementation: one `reqwest::Client` (one connection pool)
//! for the whole process, a fixed per-call timeout, no retries.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// Minimal HTTP surface used by the API façades.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` with optional query parameters and decode the body as JSON.
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ApiError>;

    /// POST `body` as JSON to `url` and decode the response as JSON.
    async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError>;

    /// GET `url` and return the raw body without any decoding.
    async fn get_bytes(&self, url: &str) -> Result<Bytes, ApiError>;

    /// Release connection resources. Must be idempotent.
    async fn close(&self) {}
}

/// reqwest-backed `HttpClient`.
pub struct ReqwestClient {
    /// `None` once closed. `reqwest::Client` is an `Arc` internally, so
    /// handing out clones per call shares the same pool.
    inner: Mutex<Option<reqwest::Client>>,
    timeout: Duration,
}

impl ReqwestClient {
    /// Build a client with the given per-call timeout.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pubapi-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::http(None, format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Mutex::new(Some(client)),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_closed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    fn handle(&self) -> Result<reqwest::Client, ApiError> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or_else(|| ApiError::http(None, "HTTP client is closed"))
    }
}

/// Turn a non-2xx response into `ApiError::Http`.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    let mut message = format!("{} from {}", status, url);
    if !body.trim().is_empty() {
        message.push_str(": ");
        message.push_str(body.trim());
    }
    Err(ApiError::http(Some(status.as_u16()), message))
}

async fn decode_json(resp: reqwest::Response) -> Result<Value, ApiError> {
    let body = resp.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| ApiError::decode(format!("response is not valid JSON: {e}")))
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        debug!(url = %url, params = params.len(), "GET");
        let mut request = self.handle()?.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let resp = ensure_success(request.send().await?).await?;
        decode_json(resp).await
    }

    async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        debug!(url = %url, "POST");
        let mut request = self.handle()?.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = ensure_success(request.send().await?).await?;
        decode_json(resp).await
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, ApiError> {
        debug!(url = %url, "GET (bytes)");
        let resp = ensure_success(self.handle()?.get(url).send().await?).await?;
        Ok(resp.bytes().await?)
    }

    async fn close(&self) {
        let previous = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if previous.is_some() {
            debug!("HTTP client closed");
        }
    }
}
