//! Uniform response envelope for JSON API calls.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

/// Outcome of a single JSON API call.
///
/// Upstream non-2xx statuses are ordinary outcomes, not errors: callers
/// branch on [`success`](Self::success) rather than catching faults. The
/// original status and headers are preserved; the body is parsed JSON, or
/// [`Value::Null`] when the upstream body was not JSON.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// True when the upstream status was 2xx.
    pub success: bool,
    /// The status the service answered with.
    pub status: StatusCode,
    /// Response headers, preserved from the raw response.
    pub headers: HeaderMap,
    /// Parsed JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Consumes a raw response into an envelope.
    ///
    /// Network failures while reading the body propagate unchanged; a body
    /// that is not valid JSON is recorded as [`Value::Null`] without
    /// affecting the success flag.
    pub async fn from_response(response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        let body = serde_json::from_str(&text).unwrap_or_else(|_| {
            debug!(status = %status, "Upstream body was not JSON");
            Value::Null
        });

        Ok(Self {
            success: status.is_success(),
            status,
            headers,
            body,
        })
    }

    /// Deserializes the body into a typed model.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_body_access() {
        let envelope = ApiResponse {
            success: true,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: serde_json::json!({"balance": 2.5}),
        };
        let balance: pawns_core::Balance = envelope.json().unwrap();
        assert_eq!(balance.balance, Some(2.5));
    }
}
