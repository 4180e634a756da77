//! Client configuration.

use std::time::Duration;

/// Production API root. Endpoint paths are appended after a `/`.
pub const DEFAULT_BASE_URL: &str = "https://previewmyemail.com/api";

/// Read timeout for GET lookups.
pub const DEFAULT_GET_TIMEOUT: Duration = Duration::from_secs(30);

/// POST covers preview generation, which the service may take around a
/// minute to answer.
pub const DEFAULT_POST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    get_timeout: Duration,
    post_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            get_timeout: DEFAULT_GET_TIMEOUT,
            post_timeout: DEFAULT_POST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another API root, e.g. a local mock server.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn get_timeout(mut self, timeout: Duration) -> Self {
        self.get_timeout = timeout;
        self
    }

    pub fn post_timeout(mut self, timeout: Duration) -> Self {
        self.post_timeout = timeout;
        self
    }

    pub fn api_root(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_for_get(&self) -> Duration {
        self.get_timeout
    }

    pub fn timeout_for_post(&self) -> Duration {
        self.post_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_root(), "https://previewmyemail.com/api");
        assert_eq!(config.timeout_for_get(), Duration::from_secs(30));
        assert!(config.timeout_for_post() >= Duration::from_secs(60));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new().base_url("http://localhost:3000/api/");
        assert_eq!(config.api_root(), "http://localhost:3000/api");
    }
}
