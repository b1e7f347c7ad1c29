//! Networking utilities for Tike
//!
//! This crate provides the HTTP probe used to sniff the declared content type
//! of embedded media URLs, with timeout handling and an optional retry policy.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod retry;

pub use client::{ContentProbe, HttpClient, HttpClientConfig, ProbeResponse};
pub use retry::RetryPolicy;
pub use reqwest::Url;

#[cfg(any(test, feature = "mock"))]
pub use client::MockContentProbe;

/// Result type for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Errors that can occur while probing a URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The HTTP client could not be constructed
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("Request failed: {0}")]
    Request(String),
}

impl ProbeError {
    /// Check if this error is worth another attempt
    ///
    /// Mirrors the network failure statuses used elsewhere in the app:
    /// 408, 425, 429 and the 5xx gateway family.
    pub fn is_transient(&self) -> bool {
        match self {
            ProbeError::Timeout | ProbeError::Request(_) => true,
            ProbeError::Status(status) => {
                matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
            ProbeError::InvalidConfig(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if let Some(status) = err.status() {
            ProbeError::Status(status.as_u16())
        } else {
            ProbeError::Request(err.to_string())
        }
    }
}
