//! Legacy HTML-scraping client.
//!
//! Fallback for environments where the JSON API is unavailable. Speaks to
//! the browser-facing host, authenticates with the login form's CSRF token,
//! and keeps a cookie jar as its credential. Exposes the same session
//! capability set as [`PawnsClient`](crate::PawnsClient).

use reqwest::Method;
use reqwest::header::HeaderMap;
use std::io::{Read, Write};
use tracing::{debug, info, instrument, warn};

use pawns_core::{DashboardSnapshot, Device, Pagination, ProxyConfig, ProxyScheme};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{self, Credential, cookies_from_response, merge_cookies};
use crate::transport::{RequestBody, Transport};

use super::parser;

// ============================================================================
// Constants
// ============================================================================

/// Browser-facing host serving the rendered dashboard.
const WEB_BASE_URL: &str = "https://pawns.iproyal.com";

/// `Accept` value for HTML pages.
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

const HOME_ENDPOINT: &str = "/";
const LOGIN_ENDPOINT: &str = "/login";
const DEVICES_ENDPOINT: &str = "/devices";

// ============================================================================
// Client
// ============================================================================

/// Client that scrapes the server-rendered dashboard.
#[derive(Debug)]
pub struct ScrapeClient {
    transport: Transport,
    credential: Option<Credential>,
}

impl ScrapeClient {
    /// Creates a client against the production dashboard host.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(WEB_BASE_URL)?.with_accept(HTML_ACCEPT))
    }

    /// Creates a client with an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(config)?,
            credential: None,
        })
    }

    // ------------------------------------------------------------------
    // Session lifecycle (same capability set as the API client)
    // ------------------------------------------------------------------

    /// Returns true when a cookie session is active.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Clears the session. Idempotent.
    pub fn logout(&mut self) {
        self.credential = None;
    }

    /// Serializes the current cookie session to `sink`.
    pub fn save_session<W: Write>(&self, sink: W) -> Result<(), ClientError> {
        session::save(&self.credential, sink)
    }

    /// Restores a cookie session from `source` without validating it.
    pub fn restore_session<R: Read>(&mut self, source: R) -> Result<(), ClientError> {
        self.credential = session::restore(source)?;
        Ok(())
    }

    /// Sets the proxy for all subsequent requests.
    pub fn set_proxy(&mut self, scheme: ProxyScheme, proxy_str: &str) -> Result<(), ClientError> {
        let proxy = ProxyConfig::parse(scheme, proxy_str)?;
        self.transport.set_proxy(Some(proxy))
    }

    /// Clears the proxy.
    pub fn remove_proxy(&mut self) -> Result<(), ClientError> {
        self.transport.set_proxy(None)
    }

    fn require_auth(&self) -> Result<&Credential, ClientError> {
        self.credential.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    // ------------------------------------------------------------------
    // Login
    // ------------------------------------------------------------------

    /// Logs in through the HTML login form.
    ///
    /// Fetches the home page for the CSRF token and the pre-login cookies,
    /// then posts the form. A redirect answer counts as success (the
    /// dashboard redirects to itself after login); any upstream rejection
    /// returns `false` rather than an error.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<bool, ClientError> {
        if self.credential.is_some() {
            return Err(ClientError::AlreadyAuthenticated);
        }

        let response = self
            .transport
            .request(
                Method::GET,
                HOME_ENDPOINT,
                &[],
                RequestBody::None,
                HeaderMap::new(),
                None,
            )
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Login page fetch rejected");
            return Ok(false);
        }

        let mut jar = cookies_from_response(&response);
        let html = response.text().await?;
        let token = parser::parse_login_token(&html)?;

        let form = [
            ("_token", token.as_str()),
            ("email", email),
            ("password", password),
        ];
        let pre_login = Credential::Cookies {
            cookies: jar.clone(),
        };
        let response = self
            .transport
            .request(
                Method::POST,
                LOGIN_ENDPOINT,
                &[],
                RequestBody::Form(&form),
                HeaderMap::new(),
                Some(&pre_login),
            )
            .await?;

        let status = response.status();
        let success = status.is_success() || status.is_redirection();
        if success {
            merge_cookies(&mut jar, cookies_from_response(&response));
            self.credential = Some(Credential::Cookies { cookies: jar });
            info!("Logged in via HTML form");
        } else {
            debug!(status = %status, "Login form rejected");
        }

        Ok(success)
    }

    // ------------------------------------------------------------------
    // Dashboard reads
    // ------------------------------------------------------------------

    /// Fetches and parses the dashboard home page.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, ClientError> {
        let html = self.fetch_page(HOME_ENDPOINT, &[]).await?;
        parser::parse_dashboard(&html)
    }

    /// Fetches one devices page, returning its devices and pagination state.
    pub async fn devices_page(&self, page: u32) -> Result<(Vec<Device>, Pagination), ClientError> {
        let html = self
            .fetch_page(DEVICES_ENDPOINT, &[("page", page.to_string())])
            .await?;
        let devices = parser::parse_device_list(&html)?;
        let pagination = parser::parse_pagination(&html)?;
        Ok((devices, pagination))
    }

    /// Fetches every devices page and concatenates the results.
    ///
    /// Page 1 is fetched first to discover the pagination bounds; when the
    /// bounds cannot be determined the page shape has drifted and a parse
    /// error is raised. Pages are then fetched sequentially in ascending
    /// order, so the combined list preserves page order.
    #[instrument(skip(self))]
    pub async fn list_all_devices(&self) -> Result<Vec<Device>, ClientError> {
        let (_, pagination) = self.devices_page(1).await?;

        let (Some(first), Some(last)) = (pagination.first, pagination.last) else {
            return Err(ClientError::Parse(
                "device pagination bounds could not be determined".to_string(),
            ));
        };

        debug!(first, last, "Aggregating device pages");
        let mut devices = Vec::new();
        for page in first..=last {
            let (page_devices, _) = self.devices_page(page).await?;
            devices.extend(page_devices);
        }
        Ok(devices)
    }

    /// Fetches a protected page and returns its HTML.
    ///
    /// The dashboard answers a logged-out (or expired) session with a
    /// redirect to the login page, which surfaces here as
    /// [`ClientError::NotAuthenticated`]; other non-2xx statuses are
    /// upstream errors.
    async fn fetch_page(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, ClientError> {
        let credential = self.require_auth()?;
        let response = self
            .transport
            .request(
                Method::GET,
                path,
                query,
                RequestBody::None,
                HeaderMap::new(),
                Some(credential),
            )
            .await?;

        let status = response.status();
        if status.is_redirection() {
            return Err(ClientError::NotAuthenticated);
        }
        if !status.is_success() {
            return Err(ClientError::Upstream { status });
        }

        Ok(response.text().await?)
    }
}
