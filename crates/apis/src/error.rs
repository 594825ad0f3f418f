//! Error types for upstream API calls.

/// Failures surfaced by the HTTP client wrapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx status, transport failure, or a call on a closed client.
    /// `status` is `None` when no response was received.
    #[error("HTTP error: {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// A 2xx response whose body was expected to be JSON but was not.
    #[error("Decode error: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn http(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode {
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::Decode { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
