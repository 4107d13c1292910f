//! Connected device types.

use serde::{Deserialize, Serialize};

/// A device currently connected to the account.
///
/// Devices are read-only and fetched per request; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// IP address the device connects from, as reported by the dashboard.
    pub ip: String,
    /// Platform name, normalized to title case (e.g. `"Android"`).
    pub platform: String,
    /// Country code, normalized to uppercase (e.g. `"US"`).
    pub country: String,
}

impl Device {
    /// Builds a device from raw dashboard attributes, normalizing as it goes.
    ///
    /// The platform attribute arrives in whatever case the markup uses
    /// (`"ANDROID"`, `"windows"`); it is normalized to title case. The
    /// country attribute is normalized to an uppercase code.
    pub fn from_raw(ip: &str, platform: &str, country: &str) -> Self {
        Self {
            ip: ip.trim().to_string(),
            platform: title_case(platform.trim()),
            country: country.trim().to_uppercase(),
        }
    }
}

/// Title-cases each whitespace-separated word of `input`.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, word) in input.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(|c| c.to_lowercase()));
        }
    }
    out
}
