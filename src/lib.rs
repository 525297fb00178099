//! skyusage - Fetch, reconcile and report satellite-internet usage
//!
//! This library wires the provider client, the reconciler and the output
//! formatters into the `skyusage` command line tool:
//! - Authenticate with OAuth2 client credentials or a pre-issued token
//! - Query billing-cycle usage for an account's service lines
//! - Reconcile it into one de-duplicated daily ledger per service line
//! - Render tables or JSON
//!
//! # Examples
//!
//! ```no_run
//! use skyusage::config::Settings;
//! use skyusage::cli::Cli;
//! use skyusage::commands::run;
//! use skyusage_terminal::get_formatter;
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> skyusage::Result<()> {
//!     let cli = Cli::parse_from(["skyusage", "usage", "--account", "ACC-12345-67890-12"]);
//!     let client = Settings::from_args(&cli.connection)?.build_client()?;
//!     let formatter = get_formatter(true, false, false);
//!     println!("{}", run(&client, &cli.command, formatter.as_ref()).await?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;

#[cfg(test)]
pub(crate) mod test_utils;

pub use skyusage_core::error::{Result, SkyusageError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
