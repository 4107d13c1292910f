//! Domain models for the Pawns dashboard.
//!
//! - [`Device`] - a connected device with normalized platform/country
//! - [`Pagination`] - page bounds derived from a rendered page list
//! - [`DashboardSnapshot`] - structured contents of the legacy home page
//! - [`ProxyConfig`] - outbound proxy settings
//! - API payload mirrors ([`UserProfile`], [`Balance`], ...)

pub mod api;
pub mod dashboard;
pub mod device;
pub mod pagination;
pub mod proxy;

pub use api::{Balance, Country, PayoutData, PayoutMethod, UserProfile};
pub use dashboard::DashboardSnapshot;
pub use device::Device;
pub use pagination::Pagination;
pub use proxy::{ProxyConfig, ProxyScheme};
