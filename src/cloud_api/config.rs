use crate::cloud_api::region::Region;
use crate::cloud_api::types::RequestError;
use std::time::Duration;

/// Environment variable overriding the region-derived API origin
pub const BASE_URL_ENV: &str = "BAMBU_CLOUD_BASE_URL";
/// Environment variable setting the request timeout in seconds
pub const TIMEOUT_ENV: &str = "BAMBU_CLOUD_TIMEOUT_SECS";

/// Client configuration
///
/// Timeouts are handed to the HTTP client; the cloud client itself never
/// retries or cancels anything.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Replaces `Region::base_url()` for every endpoint (staging, mock servers)
    pub base_url: Option<String>,
    /// Total request timeout
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Option<Duration>,
    /// `User-Agent` header value
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `BAMBU_CLOUD_BASE_URL` and `BAMBU_CLOUD_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                tracing::debug!("Using API base URL from {}: {}", BASE_URL_ENV, base_url);
                config.base_url = Some(base_url);
            }
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(e) => {
                    tracing::warn!("Ignoring {}='{}': {}", TIMEOUT_ENV, raw, e);
                }
            }
        }

        config
    }

    /// Set the API origin override (builder pattern)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (builder pattern)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout (builder pattern)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent (builder pattern)
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Origin for `region`, honouring the override
    pub fn base_url_for(&self, region: Region) -> String {
        match &self.base_url {
            Some(base_url) => base_url.trim_end_matches('/').to_string(),
            None => region.base_url().to_string(),
        }
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        builder.build().map_err(|e| {
            tracing::error!("Failed to create HTTP client: {}", e);
            RequestError::Request(format!("Failed to create HTTP client: {}", e))
        })
    }
}
