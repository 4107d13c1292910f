//! JSON API domain client.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use std::io::{Read, Write};
use tracing::{debug, info, instrument, warn};

use pawns_core::{ProxyConfig, ProxyScheme};

use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use crate::error::ClientError;
use crate::session::{self, Credential, generate_login_identifier};
use crate::transport::{RequestBody, Transport};

// ============================================================================
// Constants
// ============================================================================

/// Versioned JSON API host.
const API_BASE_URL: &str = "https://api.pawns.app/api/v1";

/// Header the payout confirmation code travels in.
const CONFIRMATION_CODE_HEADER: &str = "x-confirmation-code";

// Endpoint paths.
const TOKENS_ENDPOINT: &str = "/users/tokens";
const ME_ENDPOINT: &str = "/users/me";
const BALANCE_ENDPOINT: &str = "/users/me/balance";
const DEVICES_ENDPOINT: &str = "/users/me/devices";
const PAYOUTS_ENDPOINT: &str = "/users/me/payouts";
const CANCEL_PAYOUT_ENDPOINT: &str = "/users/me/payouts/cancel";
const PAYOUT_DATA_ENDPOINT: &str = "/users/me/payout-data";
const CONFIRMATION_CODES_ENDPOINT: &str = "/users/me/confirmation-codes";
const AFFILIATE_PAYOUTS_ENDPOINT: &str = "/users/me/affiliate/payouts";
const AFFILIATE_STATS_ENDPOINT: &str = "/users/me/affiliate/stats";
const COUNTRIES_ENDPOINT: &str = "/countries";

// ============================================================================
// Client
// ============================================================================

/// Client for the Pawns JSON API.
///
/// One method per account operation. Protected operations check the local
/// credential first and fail with [`ClientError::NotAuthenticated`] before
/// any network call; upstream non-2xx responses come back as envelopes with
/// `success = false`, never as errors.
///
/// A single instance is meant to be driven from one task at a time; the
/// credential and proxy are plain mutable state with no internal locking.
#[derive(Debug)]
pub struct PawnsClient {
    transport: Transport,
    credential: Option<Credential>,
}

impl PawnsClient {
    /// Creates a client against the production API host.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(API_BASE_URL)?)
    }

    /// Creates a client with an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(config)?,
            credential: None,
        })
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Returns true when a credential is active.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Clears the credential. Idempotent.
    pub fn logout(&mut self) {
        self.credential = None;
    }

    /// Returns the active bearer token, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.credential.as_ref().and_then(Credential::bearer_token)
    }

    /// Serializes the current credential state to `sink`.
    pub fn save_session<W: Write>(&self, sink: W) -> Result<(), ClientError> {
        session::save(&self.credential, sink)
    }

    /// Restores credential state from `source`.
    ///
    /// The restored credential is not validated here; a stale token shows
    /// up as an unauthenticated envelope on the next protected call.
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
    // Authentication
    // ------------------------------------------------------------------

    /// Logs in with email and password.
    ///
    /// Generates a fresh 21-character client identifier and submits it
    /// alongside the credentials; on a successful envelope the returned
    /// bearer token is installed as the active credential. Fails with
    /// [`ClientError::AlreadyAuthenticated`] if a credential is already
    /// active, without touching the network.
    #[instrument(skip(self, password, captcha))]
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        captcha: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        if self.credential.is_some() {
            return Err(ClientError::AlreadyAuthenticated);
        }

        let identifier = generate_login_identifier();
        let mut body = json!({
            "identifier": identifier,
            "email": email,
            "password": password,
        });
        if let Some(captcha) = captcha {
            body["captcha_response"] = json!(captcha);
        }

        let response = self
            .transport
            .request(
                Method::POST,
                TOKENS_ENDPOINT,
                &[],
                RequestBody::Json(&body),
                HeaderMap::new(),
                None,
            )
            .await?;

        let envelope = ApiResponse::from_response(response).await?;

        if envelope.success {
            let token = envelope
                .body
                .get("token")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ClientError::Parse("login response missing token field".to_string())
                })?;
            self.credential = Some(Credential::Bearer {
                token: token.to_string(),
            });
            info!("Logged in");
        } else {
            debug!(status = %envelope.status, "Login rejected by upstream");
        }

        Ok(envelope)
    }

    /// Convenience wrapper: login and report success as a boolean.
    ///
    /// Mirrors the envelope's success flag: any upstream login rejection
    /// returns `false` rather than an error. Transport failures still
    /// propagate as errors.
    pub async fn complete_login_flow(
        &mut self,
        email: &str,
        password: &str,
        captcha: Option<&str>,
    ) -> Result<bool, ClientError> {
        let envelope = self.login(email, password, captcha).await?;
        if !envelope.success {
            warn!(status = %envelope.status, "Login flow failed");
        }
        Ok(envelope.success)
    }

    // ------------------------------------------------------------------
    // Protected reads
    // ------------------------------------------------------------------

    /// Fetches the authenticated user's profile.
    pub async fn me(&self) -> Result<ApiResponse, ClientError> {
        self.get_authed(ME_ENDPOINT, &[]).await
    }

    /// Fetches the account balance.
    pub async fn balance(&self) -> Result<ApiResponse, ClientError> {
        self.get_authed(BALANCE_ENDPOINT, &[]).await
    }

    /// Fetches one page of connected devices.
    pub async fn devices(&self, page: u32, items_per_page: u32) -> Result<ApiResponse, ClientError> {
        self.get_authed(
            DEVICES_ENDPOINT,
            &[
                ("page", page.to_string()),
                ("items_per_page", items_per_page.to_string()),
            ],
        )
        .await
    }

    /// Fetches one page of past payouts.
    pub async fn payouts(&self, page: u32) -> Result<ApiResponse, ClientError> {
        self.get_authed(PAYOUTS_ENDPOINT, &[("page", page.to_string())]).await
    }

    /// Fetches one page of affiliate payouts.
    pub async fn affiliate_payouts(&self, page: u32) -> Result<ApiResponse, ClientError> {
        self.get_authed(AFFILIATE_PAYOUTS_ENDPOINT, &[("page", page.to_string())])
            .await
    }

    /// Fetches affiliate statistics.
    pub async fn affiliate_stats(&self) -> Result<ApiResponse, ClientError> {
        self.get_authed(AFFILIATE_STATS_ENDPOINT, &[]).await
    }

    /// Fetches the saved payout details.
    pub async fn my_payout_data(&self) -> Result<ApiResponse, ClientError> {
        self.get_authed(PAYOUT_DATA_ENDPOINT, &[]).await
    }

    // ------------------------------------------------------------------
    // Payout flow
    // ------------------------------------------------------------------

    /// Requests an out-of-band confirmation code for `action`.
    ///
    /// The service delivers the code through a channel outside this client
    /// (typically email); the caller feeds it back into [`payout`](Self::payout).
    #[instrument(skip(self))]
    pub async fn add_confirmation_code(&self, action: &str) -> Result<ApiResponse, ClientError> {
        let body = json!({ "action": action });
        self.post_authed(CONFIRMATION_CODES_ENDPOINT, Some(&body), HeaderMap::new())
            .await
    }

    /// Submits a payout request, authorized by a confirmation code.
    ///
    /// The code travels as a request header alongside the payout body.
    #[instrument(skip(self, code))]
    pub async fn payout(&self, method_id: u64, code: &str) -> Result<ApiResponse, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CONFIRMATION_CODE_HEADER),
            HeaderValue::from_str(code).map_err(|e| ClientError::InvalidHeader(e.to_string()))?,
        );
        let body = json!({ "payout_method_id": method_id });
        self.post_authed(PAYOUTS_ENDPOINT, Some(&body), headers).await
    }

    /// Cancels the pending payout.
    #[instrument(skip(self))]
    pub async fn cancel_payout(&self) -> Result<ApiResponse, ClientError> {
        self.post_authed(CANCEL_PAYOUT_ENDPOINT, None, HeaderMap::new()).await
    }

    // ------------------------------------------------------------------
    // Unauthenticated reads
    // ------------------------------------------------------------------

    /// Lists the countries the service supports.
    pub async fn countries(&self) -> Result<ApiResponse, ClientError> {
        self.get_public(COUNTRIES_ENDPOINT, &[]).await
    }

    /// Lists the payout methods available in a country.
    pub async fn payout_methods(&self, country_id: u64) -> Result<ApiResponse, ClientError> {
        let path = format!("{COUNTRIES_ENDPOINT}/{country_id}/payout-methods");
        self.get_public(&path, &[]).await
    }

    // ------------------------------------------------------------------
    // Request helpers
    // ------------------------------------------------------------------

    async fn get_authed(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, ClientError> {
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
        ApiResponse::from_response(response).await
    }

    async fn post_authed(
        &self,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<ApiResponse, ClientError> {
        let credential = self.require_auth()?;
        let body = match body {
            Some(value) => RequestBody::Json(value),
            None => RequestBody::None,
        };
        let response = self
            .transport
            .request(Method::POST, path, &[], body, headers, Some(credential))
            .await?;
        ApiResponse::from_response(response).await
    }

    async fn get_public(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, ClientError> {
        let response = self
            .transport
            .request(Method::GET, path, query, RequestBody::None, HeaderMap::new(), None)
            .await?;
        ApiResponse::from_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_client_is_logged_out() {
        let client = PawnsClient::new().unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.bearer_token(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut client = PawnsClient::new().unwrap();
        client.logout();
        client.logout();
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_while_authenticated_fails_locally() {
        // Unroutable base URL: the AlreadyAuthenticated guard must trip
        // before any connection attempt.
        let config = ClientConfig::new("http://192.0.2.1:1").unwrap();
        let mut client = PawnsClient::with_config(config).unwrap();
        client.credential = Some(Credential::Bearer {
            token: "tok".to_string(),
        });

        let err = client.login("a@b.c", "pw", None).await.unwrap_err();
        assert!(matches!(err, ClientError::AlreadyAuthenticated));
    }
}
