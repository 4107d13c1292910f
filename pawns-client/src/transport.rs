//! HTTP transport shared by both client variants.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response, redirect};
use tracing::debug;

use pawns_core::ProxyConfig;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::Credential;

/// Request body forms the transport knows how to send.
#[derive(Debug, Clone, Copy)]
pub enum RequestBody<'a> {
    /// No body.
    None,
    /// JSON body.
    Json(&'a serde_json::Value),
    /// URL-encoded form body (legacy login flow).
    Form(&'a [(&'a str, &'a str)]),
}

/// Issues HTTP requests with the configured defaults, proxy, and timeout.
///
/// The transport itself is stateless aside from configuration: it never
/// retries, and network-level failures surface to the caller unchanged.
/// Redirects are not followed; the legacy dashboard signals "logged out"
/// with a redirect, so callers need to see 3xx statuses as-is.
#[derive(Debug)]
pub struct Transport {
    inner: Client,
    config: ClientConfig,
}

impl Transport {
    /// Creates a transport from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let inner = Self::build_client(&config)?;
        Ok(Self { inner, config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replaces the active proxy, or clears it with `None`.
    ///
    /// reqwest fixes proxies at client build time, so the inner client is
    /// rebuilt; the session credential is unaffected.
    pub fn set_proxy(&mut self, proxy: Option<ProxyConfig>) -> Result<(), ClientError> {
        self.config.proxy = proxy;
        self.inner = Self::build_client(&self.config)?;
        Ok(())
    }

    fn build_client(config: &ClientConfig) -> Result<Client, ClientError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none());

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.to_proxy_url())?);
        }

        Ok(builder.build()?)
    }

    /// Issues a single request.
    ///
    /// Merges the configured default headers with `extra_headers`, then
    /// attaches the credential's authorization, then sends. Exactly one
    /// network call; no retries.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody<'_>,
        extra_headers: HeaderMap,
        credential: Option<&Credential>,
    ) -> Result<Response, ClientError> {
        let url = self.config.url_for(path);
        debug!(method = %method, url = %url, "Issuing request");

        let mut headers = self.config.default_headers()?;
        headers.extend(extra_headers);
        if let Some(credential) = credential {
            credential.authorize(&mut headers)?;
        }

        let mut builder = self.inner.request(method, &url).headers(headers);

        if !query.is_empty() {
            builder = builder.query(query);
        }

        match body {
            RequestBody::None => {}
            RequestBody::Json(value) => builder = builder.json(value),
            RequestBody::Form(fields) => builder = builder.form(fields),
        }

        Ok(builder.send().await?)
    }
}
