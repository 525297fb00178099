//! Core types, reconciliation and archive contract for skyusage
//!
//! This crate provides the domain types shared by every other skyusage
//! crate: the raw provider wire format, the canonical per-day usage
//! ledger, the billing-cycle reconciler and the archival contract.

pub mod archive;
pub mod error;
pub mod filters;
pub mod raw;
pub mod reconcile;
pub mod selection;
pub mod types;
pub mod usage_types;

// Re-export commonly used types
pub use error::{Result, SkyusageError};
pub use reconcile::Reconciler;
pub use selection::CycleSelection;
pub use types::{AccountId, DailyDate, ServiceLineId};
pub use usage_types::{CanonicalDailyUsage, DailyLedger, ServiceLineUsageResult, UsageReport};
