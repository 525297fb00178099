//! Billing-cycle usage reconciliation
//!
//! Turns the raw per-cycle, per-day records of a service line into one
//! [`ServiceLineUsageResult`]: a deduplicated daily ledger, cap and consumed
//! totals, and the billing-cycle window.
//!
//! The rules, applied per service line:
//!
//! - The cycle window comes from the first processed cycle and is never
//!   replaced by later cycles of the same run.
//! - Totals are reset when the ledger is still empty or a single target
//!   cycle was requested, and summed across cycles otherwise.
//! - Daily priority usage is `max(priority, opt-in priority)`. The provider
//!   reports top-up data in both counters, so adding them double-counts.
//! - A date seen again in a later cycle overwrites the earlier values.
//!
//! # Examples
//!
//! ```
//! use skyusage_core::{CycleSelection, Reconciler};
//! use skyusage_core::raw::{RawBillingCycle, RawDailyEntry};
//!
//! let cycle = RawBillingCycle {
//!     start_date: Some("2024-12-01".into()),
//!     end_date: Some("2024-12-31".into()),
//!     daily_data_usage: Some(vec![RawDailyEntry {
//!         date: Some("2024-12-15".into()),
//!         priority_gb: Some(5.0),
//!         opt_in_priority_gb: Some(5.0),
//!         standard_gb: Some(1.0),
//!         ..Default::default()
//!     }]),
//!     ..Default::default()
//! };
//!
//! let result = Reconciler::new(CycleSelection::Current).reconcile(&[cycle]);
//! let day = result.daily_usage.iter().next().unwrap();
//! assert_eq!(day.priority_gb, 5.0);
//! assert_eq!(day.total_gb, 6.0);
//! ```

use crate::raw::{QueryResponse, RawBillingCycle, RawDailyEntry};
use crate::selection::CycleSelection;
use crate::types::{DailyDate, ServiceLineId, round_gb};
use crate::usage_types::{CanonicalDailyUsage, ServiceLineUsageResult, UsageReport};
use tracing::{debug, warn};

/// Reconciles raw billing cycles under a cycle selection policy
///
/// Holds no state between calls; reconciling the same input twice yields
/// identical results.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    selection: CycleSelection,
}

impl Reconciler {
    pub fn new(selection: CycleSelection) -> Self {
        Self { selection }
    }

    /// Reconcile every service line of a query response
    ///
    /// Entries without a service line number are skipped. A service line
    /// that appears twice keeps only its last entry.
    pub fn reconcile_response(&self, response: &QueryResponse) -> UsageReport {
        let mut report = UsageReport::new();

        for line in response.results() {
            let Some(number) = line
                .service_line_number
                .as_deref()
                .filter(|n| !n.trim().is_empty())
            else {
                warn!("Skipping usage entry without a service line number");
                continue;
            };

            let result = self.reconcile(line.cycles());
            debug!(
                "Reconciled {}: {} days, cap {:.2} GB, consumed {:.2} GB",
                number,
                result.daily_usage.len(),
                result.total_cap_gb,
                result.total_consumed_gb
            );
            if report.insert(ServiceLineId::new(number), result).is_some() {
                warn!("Service line {} returned more than once, keeping the last entry", number);
            }
        }

        report
    }

    /// Select and reconcile the cycles of one service line
    pub fn reconcile(&self, cycles: &[RawBillingCycle]) -> ServiceLineUsageResult {
        let selected = self.selection.select(cycles);
        self.reconcile_selected(&selected)
    }

    /// Reconcile cycles that were already selected, in the given order
    pub fn reconcile_selected(&self, cycles: &[&RawBillingCycle]) -> ServiceLineUsageResult {
        let targeted = self.selection.is_targeted();
        let mut result = ServiceLineUsageResult::default();

        for cycle in cycles {
            if result.billing_cycle_start_date.is_none() {
                result.billing_cycle_start_date = DailyDate::from_provider(cycle.start_date());
                result.billing_cycle_end_date = DailyDate::from_provider(cycle.end_date());
            }

            if result.daily_usage.is_empty() || targeted {
                result.total_cap_gb = 0.0;
                result.total_consumed_gb = 0.0;
            }

            result.total_cap_gb += cycle.cap_gb();
            result.total_consumed_gb += cycle.consumed_gb();

            for entry in cycle.daily_entries() {
                if let Some(usage) = canonicalize(entry)
                    && let Some(previous) = result.daily_usage.upsert(usage)
                {
                    debug!(
                        "Date {} reported by more than one cycle, {:.2} GB replaced by {:.2} GB",
                        usage.date, previous.total_gb, usage.total_gb
                    );
                }
            }
        }

        result
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(CycleSelection::Current)
    }
}

/// Resolve one raw day into its canonical form
///
/// Returns `None` when the entry has no usable date.
pub fn canonicalize(entry: &RawDailyEntry) -> Option<CanonicalDailyUsage> {
    let raw_date = entry.date();
    let date = DailyDate::from_provider(raw_date);
    if date.is_none() && !raw_date.is_empty() {
        warn!("Skipping daily usage with unparseable date '{}'", raw_date);
    }
    let date = date?;

    let priority = entry.priority().max(entry.opt_in_priority());
    let standard = entry.standard();
    let total = priority + standard + entry.non_billable();

    Some(CanonicalDailyUsage {
        date,
        priority_gb: round_gb(priority),
        standard_gb: round_gb(standard),
        total_gb: round_gb(total),
    })
}
