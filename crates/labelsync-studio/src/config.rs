//! Annotation platform client configuration

use std::time::Duration;

/// Configuration for the annotation platform API
#[derive(Clone, Debug)]
pub struct StudioConfig {
    /// Base URL of the platform, e.g. "https://label.example.com"
    pub url: String,
    /// API access token, sent as `Authorization: Token <token>`
    pub access_token: String,
    /// Request timeout
    pub timeout: Duration,
    /// Page size used when listing projects
    pub page_size: u32,
}

impl StudioConfig {
    /// Create a new config
    pub fn new(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(30),
            page_size: 100,
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the project listing page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = StudioConfig::new("https://label.example.com/", "test-token");

        assert_eq!(config.access_token, "test-token");
        assert_eq!(
            config.endpoint("/api/projects/"),
            "https://label.example.com/api/projects/"
        );
        assert_eq!(config.with_page_size(0).page_size, 1);
    }
}
