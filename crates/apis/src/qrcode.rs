//! QR code generator façade (`api.qrserver.com`).
//!
//! The only binary-producing upstream: responses go through
//! `HttpClient::get_bytes` and are never JSON-decoded.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::ApiError;
use crate::http::HttpClient;

#[derive(Clone)]
pub struct QrCodeApi {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl QrCodeApi {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the PNG encoding `data`.
    pub fn qrcode_url(&self, data: &str) -> String {
        format!(
            "{}/create-qr-code/?data={}",
            self.base_url,
            urlencoding::encode(data)
        )
    }

    /// Raw image bytes (PNG by default) encoding `data`.
    pub async fn generate_qrcode(&self, data: &str) -> Result<Bytes, ApiError> {
        self.client.get_bytes(&self.qrcode_url(data)).await
    }
}
