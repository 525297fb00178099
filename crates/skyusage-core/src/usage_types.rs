//! Reconciled usage data types
//!
//! Pure data structures produced by the reconciler and consumed by the
//! archive and terminal layers.

use crate::types::{DailyDate, ServiceLineId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// One reconciled day of usage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDailyUsage {
    /// Usage day
    pub date: DailyDate,
    /// `max(priority, opt-in priority)`, rounded to 2 decimals
    pub priority_gb: f64,
    /// Standard data, rounded to 2 decimals
    pub standard_gb: f64,
    /// Priority + standard + non-billable, rounded to 2 decimals
    pub total_gb: f64,
}

/// Per-day usage keyed by date, iterated in first-insertion order
///
/// Inserting a date that is already present replaces its values in place,
/// so the position of a day never moves once it has been seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyLedger {
    entries: Vec<CanonicalDailyUsage>,
    index: HashMap<DailyDate, usize>,
}

impl DailyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `usage.date`
    ///
    /// Returns the replaced entry, if any.
    pub fn upsert(&mut self, usage: CanonicalDailyUsage) -> Option<CanonicalDailyUsage> {
        match self.index.get(&usage.date) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], usage)),
            None => {
                self.index.insert(usage.date, self.entries.len());
                self.entries.push(usage);
                None
            }
        }
    }

    pub fn get(&self, date: &DailyDate) -> Option<&CanonicalDailyUsage> {
        self.index.get(date).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalDailyUsage> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[CanonicalDailyUsage] {
        &self.entries
    }

    /// Keep only the days for which `keep` returns true, preserving order
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&CanonicalDailyUsage) -> bool,
    {
        self.entries.retain(|entry| keep(entry));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.date, pos))
            .collect();
    }
}

impl FromIterator<CanonicalDailyUsage> for DailyLedger {
    fn from_iter<I: IntoIterator<Item = CanonicalDailyUsage>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for usage in iter {
            ledger.upsert(usage);
        }
        ledger
    }
}

impl<'a> IntoIterator for &'a DailyLedger {
    type Item = &'a CanonicalDailyUsage;
    type IntoIter = std::slice::Iter<'a, CanonicalDailyUsage>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for DailyLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

impl<'de> Deserialize<'de> for DailyLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<CanonicalDailyUsage>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Reconciled usage of one service line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceLineUsageResult {
    /// Data cap in GB (summed across cycles unless a single cycle was targeted)
    pub total_cap_gb: f64,
    /// Consumed data in GB, accumulated like `total_cap_gb`
    pub total_consumed_gb: f64,
    /// Deduplicated per-day usage
    pub daily_usage: DailyLedger,
    /// Start of the first processed cycle, not necessarily the latest one
    pub billing_cycle_start_date: Option<DailyDate>,
    /// End of the first processed cycle
    pub billing_cycle_end_date: Option<DailyDate>,
}

impl ServiceLineUsageResult {
    /// Sum the daily ledger
    pub fn daily_totals(&self) -> DailyTotals {
        DailyTotals::from_daily(self.daily_usage.as_slice())
    }
}

/// Reconciled usage of every service line returned for one account
pub type UsageReport = BTreeMap<ServiceLineId, ServiceLineUsageResult>;

/// Totals over a run of days
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub priority_gb: f64,
    pub standard_gb: f64,
    pub total_gb: f64,
    pub days: usize,
}

impl DailyTotals {
    pub fn from_daily(daily_usage: &[CanonicalDailyUsage]) -> Self {
        let mut totals = Self::default();
        for daily in daily_usage {
            totals.priority_gb += daily.priority_gb;
            totals.standard_gb += daily.standard_gb;
            totals.total_gb += daily.total_gb;
            totals.days += 1;
        }
        totals
    }
}
