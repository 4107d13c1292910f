// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pawns Client
//!
//! Clients for the Pawns account dashboard, in two variants behind one
//! session capability set:
//!
//! - [`PawnsClient`] - the primary client, speaking the versioned JSON API
//!   with a bearer-token credential
//! - [`scrape::ScrapeClient`] - the fallback, scraping the server-rendered
//!   HTML dashboard with a cookie-jar credential
//!
//! Both variants share [`Transport`] (default headers, proxy, timeout) and
//! the [`session`] module (credential state, save/restore, the client-side
//! login identifier).
//!
//! ## Example
//!
//! ```ignore
//! use pawns_client::PawnsClient;
//!
//! let mut client = PawnsClient::new()?;
//! if client.complete_login_flow("user@example.com", "password", None).await? {
//!     let balance = client.balance().await?;
//!     if balance.success {
//!         println!("{}", balance.body);
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod scrape;
pub mod session;
pub mod transport;

pub use client::PawnsClient;
pub use config::ClientConfig;
pub use envelope::ApiResponse;
pub use error::ClientError;
pub use scrape::ScrapeClient;
pub use session::{Credential, generate_login_identifier};
pub use transport::{RequestBody, Transport};

// Re-export the core models callers see in every payload.
pub use pawns_core::{
    Balance, Country, DashboardSnapshot, Device, Pagination, PayoutData, PayoutMethod,
    ProxyConfig, ProxyScheme, UserProfile,
};
