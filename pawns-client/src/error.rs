//! Client error types.

use thiserror::Error;

/// Error type for client operations.
///
/// Upstream non-2xx responses from the JSON API are deliberately not part of
/// this taxonomy: they are ordinary outcomes carried inside
/// [`ApiResponse`](crate::ApiResponse) with `success = false`. Only the
/// legacy scraping flow, which returns typed payloads instead of envelopes,
/// surfaces unexpected upstream statuses through [`ClientError::Upstream`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A protected operation was attempted with no active credential.
    ///
    /// Raised locally, before any network call is made.
    #[error("Not authenticated: log in before calling protected operations")]
    NotAuthenticated,

    /// Login was attempted while a credential is already active.
    #[error("Already authenticated: log out before logging in again")]
    AlreadyAuthenticated,

    /// Expected structure missing from a response considered mandatory.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unexpected upstream status on a legacy scraping call.
    #[error("Upstream returned HTTP {status}")]
    Upstream {
        /// The status the service answered with.
        status: reqwest::StatusCode,
    },

    /// Network-level failure, propagated unchanged from the HTTP layer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid header value, usually a credential that does not fit a header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while saving or restoring a session blob.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core model error.
    #[error("Core error: {0}")]
    Core(#[from] pawns_core::CoreError),
}
