//! Session credential state.
//!
//! Both client variants authenticate through the same capability set
//! (authorize a request, report state, clear, save, restore); they differ
//! only in which [`Credential`] variant they hold. The JSON API client
//! carries a bearer token, the legacy scraping client a cookie jar.

use rand::Rng;
use reqwest::Response;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::warn;

use crate::error::ClientError;

/// Length of the client-generated login identifier.
const IDENTIFIER_LEN: usize = 21;

/// Alphabet the login identifier is drawn from.
const IDENTIFIER_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

// ============================================================================
// Credential
// ============================================================================

/// The active transport-level credential.
///
/// Exactly one variant is active at a time; "logged out" is represented by
/// the client holding no credential at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credential {
    /// Bearer token for the JSON API.
    Bearer {
        /// The token, sent as `Authorization: Bearer <token>`.
        token: String,
    },
    /// Cookie jar for the legacy HTML flow.
    Cookies {
        /// Cookies as `(name, value)` pairs, sent as a `Cookie` header.
        cookies: Vec<(String, String)>,
    },
}

impl Credential {
    /// Attaches this credential to an outgoing request's headers.
    pub fn authorize(&self, headers: &mut HeaderMap) -> Result<(), ClientError> {
        match self {
            Self::Bearer { token } => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
            Self::Cookies { cookies } => {
                let value = HeaderValue::from_str(&cookies_to_header(cookies))
                    .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
                headers.insert(COOKIE, value);
            }
        }
        Ok(())
    }

    /// Returns the bearer token, if this is a bearer credential.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Self::Bearer { token } => Some(token),
            Self::Cookies { .. } => None,
        }
    }
}

/// Renders cookie pairs as a `Cookie` header value.
pub fn cookies_to_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extracts `Set-Cookie` pairs from a response.
///
/// Only the leading `name=value` of each cookie is kept; attributes like
/// `Path` or `Expires` are dropped, since the jar is replayed verbatim.
pub fn cookies_from_response(response: &Response) -> Vec<(String, String)> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Merges freshly received cookies into a jar, replacing by name.
pub fn merge_cookies(jar: &mut Vec<(String, String)>, fresh: Vec<(String, String)>) {
    for (name, value) in fresh {
        if let Some(existing) = jar.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            jar.push((name, value));
        }
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Serializes the current credential state to a byte sink.
///
/// The blob format is an implementation detail; it only has to round-trip
/// through [`restore`] on the same client version.
pub fn save<W: Write>(credential: &Option<Credential>, mut sink: W) -> Result<(), ClientError> {
    let blob = serde_json::to_vec(credential)?;
    sink.write_all(&blob)?;
    Ok(())
}

/// Restores credential state from a byte source.
///
/// No validation happens here: a corrupt or stale blob restores to the
/// logged-out state and surfaces as an authentication failure on the first
/// subsequent protected call, not at restore time.
pub fn restore<R: Read>(mut source: R) -> Result<Option<Credential>, ClientError> {
    let mut blob = Vec::new();
    source.read_to_end(&mut blob)?;

    match serde_json::from_slice(&blob) {
        Ok(credential) => Ok(credential),
        Err(e) => {
            warn!(error = %e, "Session blob did not deserialize, restoring logged-out state");
            Ok(None)
        }
    }
}

// ============================================================================
// Login identifier
// ============================================================================

/// Generates the opaque client-side login identifier.
///
/// Fixed-length 21-character string over `{A-Z, a-z, 0-9}`, drawn from the
/// OS entropy source. The server binds it to the issued token; its exact
/// upstream semantics are undocumented, so only the format is contractual.
pub fn generate_login_identifier() -> String {
    let mut rng = rand::rngs::OsRng;
    (0..IDENTIFIER_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..IDENTIFIER_ALPHABET.len());
            IDENTIFIER_ALPHABET[idx] as char
        })
        .collect()
}
