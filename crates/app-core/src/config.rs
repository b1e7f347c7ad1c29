//! Classifier configuration

use networking::HttpClientConfig;

use crate::notifications::NotificationFilter;

/// Default number of probes allowed in flight per batch
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 8;

/// Configuration for [`crate::EmbedClassifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Upper bound on concurrent probes within one batch
    pub max_concurrent_probes: usize,
    /// Settings for the probe HTTP client
    pub http: HttpClientConfig,
    /// Which notifications survive classification
    pub notifications: NotificationFilter,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            http: HttpClientConfig::default(),
            notifications: NotificationFilter::default(),
        }
    }
}

impl ClassifierConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency bound
    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = max;
        self
    }

    /// Set the HTTP client settings
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Set the notification filter
    pub fn with_notifications(mut self, filter: NotificationFilter) -> Self {
        self.notifications = filter;
        self
    }

    /// Effective concurrency bound (never zero)
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_probes.max(1)
    }
}
