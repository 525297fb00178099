//! Filtering of reconciled usage
//!
//! # Examples
//!
//! ```
//! use skyusage_core::filters::DateRangeFilter;
//!
//! let filter = DateRangeFilter::new()
//!     .with_since("2025-10-13".parse().unwrap())
//!     .with_until("2025-11-09".parse().unwrap());
//! assert!(!filter.is_empty());
//! ```

use crate::types::DailyDate;
use crate::usage_types::{CanonicalDailyUsage, UsageReport};

/// Inclusive date range applied to each service line's daily usage
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeFilter {
    /// Start date filter (inclusive)
    pub since: Option<DailyDate>,
    /// End date filter (inclusive)
    pub until: Option<DailyDate>,
}

impl DateRangeFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, date: DailyDate) -> Self {
        self.since = Some(date);
        self
    }

    pub fn with_until(mut self, date: DailyDate) -> Self {
        self.until = Some(date);
        self
    }

    /// True when neither bound is set
    pub fn is_empty(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn matches(&self, usage: &CanonicalDailyUsage) -> bool {
        self.since.is_none_or(|since| usage.date >= since)
            && self.until.is_none_or(|until| usage.date <= until)
    }

    /// Restrict every service line to the range
    ///
    /// Service lines with no remaining days are dropped from the report;
    /// totals and cycle window are left untouched.
    pub fn apply(&self, report: UsageReport) -> UsageReport {
        if self.is_empty() {
            return report;
        }

        report
            .into_iter()
            .filter_map(|(line, mut usage)| {
                usage.daily_usage.retain(|day| self.matches(day));
                (!usage.daily_usage.is_empty()).then_some((line, usage))
            })
            .collect()
    }
}
