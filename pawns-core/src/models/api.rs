//! Typed mirrors of the JSON API payloads.
//!
//! Every domain call returns its raw JSON body in the response envelope;
//! these structs are optional conveniences for callers that want typed
//! access. All fields tolerate absence, since the upstream service adds
//! and drops fields without notice.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile (`GET /users/me`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Account creation timestamp, as reported.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Account balance (`GET /users/me/balance`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Available balance.
    #[serde(default)]
    pub balance: Option<f64>,
    /// Lifetime earnings, when reported.
    #[serde(default)]
    pub total_earnings: Option<f64>,
}

/// A country the service supports (`GET /countries`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Country {
    /// Country id, used to look up payout methods.
    #[serde(default)]
    pub id: Option<u64>,
    /// Country name.
    #[serde(default)]
    pub name: Option<String>,
    /// ISO-like country code.
    #[serde(default)]
    pub code: Option<String>,
}

/// A payout method available in a country
/// (`GET /countries/{id}/payout-methods`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayoutMethod {
    /// Method id, passed to the payout call.
    #[serde(default)]
    pub id: Option<u64>,
    /// Human-readable method name.
    #[serde(default)]
    pub name: Option<String>,
    /// Minimum payout amount for this method, when reported.
    #[serde(default)]
    pub min_amount: Option<f64>,
}

/// Saved payout details (`GET /users/me/payout-data`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayoutData {
    /// Selected payout method id.
    #[serde(default)]
    pub payout_method_id: Option<u64>,
    /// Destination account or wallet address.
    #[serde(default)]
    pub address: Option<String>,
}
