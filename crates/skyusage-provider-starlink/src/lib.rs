//! Starlink enterprise API client for skyusage
//!
//! This crate authenticates against the provider with OAuth2 client
//! credentials, issues the billing-cycle usage query and hands the raw
//! response to the core reconciler.

pub mod accounts;
pub mod auth;
pub mod client;
pub mod retry;
pub mod service_lines;
pub mod usage;

pub use auth::{ClientCredentials, StaticToken, TokenSource};
pub use client::{StarlinkClient, StarlinkClientBuilder};
pub use retry::RetryPolicy;
pub use usage::{UsageFetcher, UsageQuery};
