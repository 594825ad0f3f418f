//! API aggregator.
//!
//! `ApiManager` owns the process's single `HttpClient` and one façade per
//! upstream, all sharing that client.

use std::future::Future;
use std::sync::Arc;

use pubapi_core::{HttpConfig, UpstreamConfig};
use tracing::{debug, info};

use crate::catfacts::CatFactsApi;
use crate::error::ApiError;
use crate::http::{HttpClient, ReqwestClient};
use crate::jokes::JokeApi;
use crate::jsonplaceholder::JsonPlaceholderApi;
use crate::qrcode::QrCodeApi;

pub struct ApiManager {
    client: Arc<dyn HttpClient>,
    upstream: UpstreamConfig,
    pub jsonplaceholder: JsonPlaceholderApi,
    pub catfacts: CatFactsApi,
    pub jokes: JokeApi,
    pub qrcode: QrCodeApi,
}

impl ApiManager {
    /// Build the shared reqwest client and every façade on top of it.
    ///
    /// A failure here means the server cannot start.
    pub fn open(upstream: &UpstreamConfig, http: &HttpConfig) -> Result<Self, ApiError> {
        let client = ReqwestClient::new(http.timeout())?;
        info!(timeout_secs = http.timeout_secs, "API manager opened");
        Ok(Self::with_client(Arc::new(client), upstream))
    }

    /// Build the façades on top of an existing client.
    pub fn with_client(client: Arc<dyn HttpClient>, upstream: &UpstreamConfig) -> Self {
        Self {
            jsonplaceholder: JsonPlaceholderApi::new(client.clone(), upstream.jsonplaceholder_url.clone()),
            catfacts: CatFactsApi::new(client.clone(), upstream.catfacts_url.clone()),
            jokes: JokeApi::new(client.clone(), upstream.jokes_url.clone()),
            qrcode: QrCodeApi::new(client.clone(), upstream.qrcode_url.clone()),
            upstream: upstream.clone(),
            client,
        }
    }

    pub fn upstream(&self) -> &UpstreamConfig {
        &self.upstream
    }

    /// Release the shared client. Safe to call more than once.
    pub async fn close(&self) {
        debug!("closing API manager");
        self.client.close().await;
    }

    /// Open a manager, run `f` with it, and close it whatever `f` returns.
    pub async fn scoped<F, Fut, T, E>(
        upstream: &UpstreamConfig,
        http: &HttpConfig,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(Arc<ApiManager>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ApiError>,
    {
        let manager = Arc::new(Self::open(upstream, http)?);
        let result = f(manager.clone()).await;
        manager.close().await;
        result
    }
}
