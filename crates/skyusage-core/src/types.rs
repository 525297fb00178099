//! Core domain types for skyusage
//!
//! Strongly-typed identifiers for provider accounts and service lines, the
//! calendar date used as the ledger key, and the small numeric helpers the
//! reconciler relies on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SkyusageError;

/// Provider account number, e.g. `ACC-12345-67890-12`
///
/// # Examples
/// ```
/// use skyusage_core::types::AccountId;
///
/// let account = AccountId::new("ACC-12345-67890-12");
/// assert_eq!(account.as_str(), "ACC-12345-67890-12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new AccountId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty once surrounding whitespace is ignored
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-issued service line (terminal subscription) number
///
/// Service lines key the usage report, so the type is ordered and hashable.
///
/// # Examples
/// ```
/// use skyusage_core::types::ServiceLineId;
///
/// let line = ServiceLineId::new("SL-123-456-78");
/// assert_eq!(line.to_string(), "SL-123-456-78");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceLineId(String);

impl ServiceLineId {
    /// Create a new ServiceLineId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServiceLineId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calendar date of a usage day or billing-cycle boundary
///
/// The provider sends dates as `YYYY-MM-DD`, sometimes with a `T...` time
/// suffix. Only the date portion is ever significant.
///
/// # Examples
/// ```
/// use skyusage_core::types::DailyDate;
///
/// let daily = DailyDate::from_provider("2024-12-15T00:00:00Z").unwrap();
/// assert_eq!(daily.format("%Y-%m-%d"), "2024-12-15");
/// assert!(DailyDate::from_provider("").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Parse a provider date string, ignoring any time component
    ///
    /// Returns `None` for empty or unparseable input.
    pub fn from_provider(raw: &str) -> Option<Self> {
        let date_part = date_portion(raw);
        if date_part.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .ok()
            .map(Self)
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }
}

impl fmt::Display for DailyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DailyDate {
    type Err = SkyusageError;

    /// Strict `YYYY-MM-DD` parsing for user input
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| SkyusageError::InvalidDate(format!("'{s}'. Use YYYY-MM-DD")))
    }
}

/// Keep only the date portion of a provider timestamp (everything before the first `T`)
pub fn date_portion(raw: &str) -> &str {
    raw.split('T').next().unwrap_or_default()
}

/// Round a GB quantity to two decimals
///
/// Rounds the stored binary value, exact ties to even: `2.675` is really
/// `2.67499..` and becomes `2.67`, `0.125` becomes `0.12`. Scaling by 100
/// first would round both up.
pub fn round_gb(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
