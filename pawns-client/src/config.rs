//! Client configuration.
//!
//! Everything the original service client kept as ambient process state
//! (default headers, proxy, base URL) lives in an explicit [`ClientConfig`]
//! owned by the client instance instead.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;
use url::Url;

use pawns_core::ProxyConfig;

use crate::error::ClientError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `Accept-Language` sent with every request.
const DEFAULT_LOCALE: &str = "en-US,en;q=0.9";

/// Configuration owned by a client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all request paths are appended to.
    pub base_url: Url,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// `Accept-Language` sent with every request.
    pub locale: String,
    /// `Accept` sent with every request.
    pub accept: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Active proxy, applied to every request until changed or cleared.
    pub proxy: Option<ProxyConfig>,
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with default headers,
    /// timeout, and no proxy.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            user_agent: concat!("pawns-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            accept: "application/json".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `Accept` header value.
    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accept = accept.to_string();
        self
    }

    /// Sets the proxy.
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Builds the default header set merged into every request.
    pub fn default_headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&self.accept)
                .map_err(|e| ClientError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&self.locale)
                .map_err(|e| ClientError::InvalidHeader(e.to_string()))?,
        );
        Ok(headers)
    }

    /// Renders `path` against the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}
