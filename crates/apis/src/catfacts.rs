//! Cat Facts façade (`catfact.ninja`).

use std::sync::Arc;

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpClient;

#[derive(Clone)]
pub struct CatFactsApi {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl CatFactsApi {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One random fact. Each call may return a different payload.
    pub async fn get_random_fact(&self) -> Result<Value, ApiError> {
        self.client.get(&format!("{}/fact", self.base_url), &[]).await
    }

    /// Several random facts. `limit` goes to the upstream as `?limit=N`;
    /// the response (a paginated envelope) is returned untouched.
    pub async fn get_facts(&self, limit: u32) -> Result<Value, ApiError> {
        self.client
            .get(
                &format!("{}/facts", self.base_url),
                &[("limit", limit.to_string())],
            )
            .await
    }
}
