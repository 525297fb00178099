//! CLI interface for skyusage
//!
//! This module defines the command-line interface using clap. Credentials
//! and endpoints fall back to environment variables, which may also come
//! from a `.env` file in the working directory.
//!
//! # Example
//!
//! ```bash
//! # List all accounts
//! skyusage accounts
//!
//! # Current-cycle usage for two terminals
//! skyusage usage --account ACC-12345-67890-12 --service-lines SL-123-456-78 SL-987-654-32
//!
//! # Three cycles, restricted to a date range, as JSON
//! skyusage usage --account ACC-1 --cycles 3 --since 2025-10-13 --until 2025-11-09 --json
//! ```

use clap::{Args, Parser, Subcommand};
use skyusage_core::types::DailyDate;
use skyusage_provider_starlink::auth::DEFAULT_TOKEN_URL;
use skyusage_provider_starlink::client::DEFAULT_API_URL;

/// Fetch, reconcile and report satellite-internet usage
#[derive(Parser, Debug, Clone)]
#[command(name = "skyusage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default only shows warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output usage as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Provider endpoint, credentials and request behaviour
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// OAuth2 client id
    #[arg(long, env = "STARLINK_CLIENT_ID", global = true, hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[arg(long, env = "STARLINK_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Pre-issued bearer token (skips the client-credentials exchange)
    #[arg(long, env = "STARLINK_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, env = "STARLINK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// OAuth2 token endpoint
    #[arg(long, env = "STARLINK_TOKEN_URL", default_value = DEFAULT_TOKEN_URL, global = true)]
    pub token_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    pub timeout: u64,

    /// Retries for connection failures, rate limits and server errors
    #[arg(long, default_value = "0", global = true)]
    pub retries: u32,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all accounts
    Accounts,

    /// List the service lines (terminals) of an account
    Terminals {
        /// Account number
        #[arg(long)]
        account: String,
    },

    /// Show details of one service line
    Details {
        /// Account number
        #[arg(long)]
        account: String,

        /// Service line number
        #[arg(long)]
        service_line: String,
    },

    /// Fetch and reconcile billing-cycle usage
    Usage(UsageArgs),

    /// Print the unprocessed billing-cycle query response
    Raw {
        /// Account number
        #[arg(long)]
        account: String,

        /// Number of billing cycles to fetch, current included
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        cycles: u32,
    },
}

/// Arguments for the usage report
#[derive(Args, Debug, Clone)]
pub struct UsageArgs {
    /// Account number
    #[arg(long)]
    pub account: String,

    /// Restrict to these service lines
    #[arg(long, num_args = 1..)]
    pub service_lines: Vec<String>,

    /// Number of billing cycles to fetch, current included
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles: u32,

    /// Only the billing cycle containing this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub target_date: Option<DailyDate>,

    /// Only days on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub since: Option<DailyDate>,

    /// Only days on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub until: Option<DailyDate>,
}

/// Parse a `YYYY-MM-DD` command line date
pub fn parse_date_arg(s: &str) -> Result<DailyDate, String> {
    s.parse::<DailyDate>().map_err(|e| e.to_string())
}
