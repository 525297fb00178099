//! Terminal output formatting for skyusage
//!
//! This crate provides table and JSON output formatters for reconciled
//! usage reports and raw API records.

pub mod output;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
