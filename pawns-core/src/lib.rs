// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pawns Core
//!
//! Core types and models for the Pawns dashboard client.
//!
//! This crate holds the transport-free pieces shared by both client
//! variants (the JSON API client and the legacy HTML fallback):
//!
//! - Domain models: [`Device`], [`Pagination`], [`DashboardSnapshot`],
//!   [`ProxyConfig`]
//! - Typed API payload mirrors: [`UserProfile`], [`Balance`], [`Country`],
//!   [`PayoutMethod`], [`PayoutData`]
//! - The core error type: [`CoreError`]
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    Balance, Country, DashboardSnapshot, Device, Pagination, PayoutData, PayoutMethod,
    ProxyConfig, ProxyScheme, UserProfile,
};
