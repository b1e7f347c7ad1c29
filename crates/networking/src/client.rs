//! HTTP probe client
//!
//! Issues `HEAD` requests against arbitrary third-party media URLs and reports
//! the declared `Content-Type`. The [`ContentProbe`] trait is the seam the
//! embed classifier depends on, so tests can count and script probes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect, Client as ReqwestClient, Url};

use crate::retry::RetryPolicy;
use crate::{ProbeError, Result};

/// Default per-request timeout for probes
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of redirects followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the probe HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
    /// Retry policy applied to each probe
    pub retry: RetryPolicy,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("Tike/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            retry: RetryPolicy::default(),
        }
    }
}

impl HttpClientConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the redirect limit
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// =============================================================================
// Probe abstraction
// =============================================================================

/// Outcome of a successful probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Raw `Content-Type` header, empty when the server sent none
    pub content_type: String,
}

impl ProbeResponse {
    /// Create a 200 response with the given content type
    pub fn ok(content_type: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
        }
    }
}

/// Something that can report the declared content type of a URL
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ContentProbe: Send + Sync {
    /// Probe `url` and return its status and declared content type
    async fn probe(&self, url: &Url) -> Result<ProbeResponse>;
}

// =============================================================================
// reqwest implementation
// =============================================================================

/// `HEAD`-based probe backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| ProbeError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    async fn head_once(&self, url: &Url) -> Result<ProbeResponse> {
        let response = self.client.head(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(ProbeResponse {
            status: status.as_u16(),
            content_type,
        })
    }
}

#[async_trait]
impl ContentProbe for HttpClient {
    async fn probe(&self, url: &Url) -> Result<ProbeResponse> {
        let result = self.config.retry.run(|| self.head_once(url)).await;

        match &result {
            Ok(response) => tracing::debug!(
                %url,
                status = response.status,
                content_type = %response.content_type,
                "Probed URL"
            ),
            Err(e) => tracing::debug!(%url, "Probe failed: {}", e),
        }

        result
    }
}
