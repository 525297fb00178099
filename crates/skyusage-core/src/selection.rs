//! Billing-cycle selection
//!
//! Decides which of the cycles returned for a service line are reconciled.

use crate::raw::RawBillingCycle;
use crate::types::DailyDate;
use tracing::debug;

/// Which returned cycles to reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSelection {
    /// Every cycle whose inclusive `[start, end]` contains the date
    Containing(DailyDate),
    /// Only the first returned cycle (the current one)
    Current,
    /// Every returned cycle, in provider order
    All,
}

impl CycleSelection {
    /// Selection policy for a fetch of `cycles_to_fetch` cycles
    ///
    /// A target date always wins; otherwise a single-cycle fetch keeps only
    /// the first cycle even if the provider returned more.
    pub fn for_fetch(cycles_to_fetch: u32, target_cycle_date: Option<DailyDate>) -> Self {
        match target_cycle_date {
            Some(date) => Self::Containing(date),
            None if cycles_to_fetch == 1 => Self::Current,
            None => Self::All,
        }
    }

    /// Whether a specific cycle was requested
    pub fn is_targeted(&self) -> bool {
        matches!(self, Self::Containing(_))
    }

    /// Apply the policy, preserving provider order
    pub fn select<'a>(&self, cycles: &'a [RawBillingCycle]) -> Vec<&'a RawBillingCycle> {
        let selected: Vec<&RawBillingCycle> = match self {
            Self::Containing(date) => cycles
                .iter()
                .filter(|cycle| cycle_contains(cycle, date))
                .collect(),
            Self::Current => cycles.iter().take(1).collect(),
            Self::All => cycles.iter().collect(),
        };
        debug!(
            "Selected {} of {} billing cycles ({:?})",
            selected.len(),
            cycles.len(),
            self
        );
        selected
    }
}

/// Inclusive date-range containment; cycles with unparseable bounds never match
pub fn cycle_contains(cycle: &RawBillingCycle, date: &DailyDate) -> bool {
    match (
        DailyDate::from_provider(cycle.start_date()),
        DailyDate::from_provider(cycle.end_date()),
    ) {
        (Some(start), Some(end)) => start <= *date && *date <= end,
        _ => false,
    }
}
