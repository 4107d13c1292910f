//! Dashboard snapshot returned by the legacy HTML flow.

use serde::{Deserialize, Serialize};

use super::device::Device;

/// Structured contents of the dashboard home page.
///
/// Balance, traffic, and the device list are mandatory page sections; the
/// referral link is optional and recorded as absent when the markup lacks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Account balance, exactly as rendered (e.g. `"$1.23"`).
    pub balance: String,
    /// Traffic counter, exactly as rendered.
    pub traffic: String,
    /// Devices listed on the page, truncated to the page size by the source.
    pub devices: Vec<Device>,
    /// Affiliate referral link, when the page shows one.
    pub referral_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let snapshot = DashboardSnapshot {
            balance: "$1.50".to_string(),
            traffic: "2.3 GB".to_string(),
            devices: vec![Device::from_raw("1.2.3.4", "android", "us")],
            referral_link: None,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: DashboardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
