//! Legacy HTML-scraping variant.
//!
//! The brittle half of the system: the dashboard's server-rendered markup
//! is the only "API" here, so [`parser`] scopes every extraction to the
//! narrowest stable selector and [`ScrapeClient`] treats redirects as the
//! logged-out signal.

pub mod client;
pub mod parser;

pub use client::ScrapeClient;
