//! Archival of reconciled usage
//!
//! The archive owns the mapping from provider service line numbers to its
//! own rows and stores one consumed-GB value per `(row, date)`. Writing the
//! same report twice is idempotent: stored values within
//! [`ARCHIVE_TOLERANCE_GB`] of the new value are left alone.

use crate::error::Result;
use crate::types::{DailyDate, ServiceLineId};
use crate::usage_types::UsageReport;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Stored and reconciled values closer than this are considered equal
pub const ARCHIVE_TOLERANCE_GB: f64 = 0.01;

/// Whether a stored value must be replaced by a newly reconciled one
pub fn differs(stored_gb: f64, new_gb: f64) -> bool {
    (stored_gb - new_gb).abs() > ARCHIVE_TOLERANCE_GB
}

/// Storage backend for daily usage history
#[async_trait]
pub trait UsageArchive: Send + Sync {
    /// Internal row id of a provider service line, if it is known
    async fn service_line_row(&self, service_line: &ServiceLineId) -> Result<Option<i64>>;

    /// Stored consumed GB for a day
    async fn stored_usage(&self, row: i64, date: DailyDate) -> Result<Option<f64>>;

    async fn insert_usage(&self, row: i64, date: DailyDate, consumed_gb: f64) -> Result<()>;

    async fn update_usage(&self, row: i64, date: DailyDate, consumed_gb: f64) -> Result<()>;
}

/// Outcome counters of one archive run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveStats {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub missing_service_lines: usize,
}

/// Upsert every day of the report into the archive
///
/// The archived quantity is the day's `total_gb`. Service lines the archive
/// does not know are counted and skipped.
pub async fn archive_usage<A>(archive: &A, report: &UsageReport) -> Result<ArchiveStats>
where
    A: UsageArchive + ?Sized,
{
    let mut stats = ArchiveStats::default();

    for (service_line, usage) in report {
        let Some(row) = archive.service_line_row(service_line).await? else {
            warn!("Service line {} not found in archive, skipping", service_line);
            stats.missing_service_lines += 1;
            continue;
        };

        for day in &usage.daily_usage {
            match archive.stored_usage(row, day.date).await? {
                Some(stored) if differs(stored, day.total_gb) => {
                    debug!(
                        "Updating {} on {}: {:.2} -> {:.2} GB",
                        service_line, day.date, stored, day.total_gb
                    );
                    archive.update_usage(row, day.date, day.total_gb).await?;
                    stats.updated += 1;
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    debug!("Inserting {} on {}: {:.2} GB", service_line, day.date, day.total_gb);
                    archive.insert_usage(row, day.date, day.total_gb).await?;
                    stats.inserted += 1;
                }
            }
        }
    }

    info!(
        "Archived usage: inserted {}, updated {}, unchanged {}, missing service lines {}",
        stats.inserted, stats.updated, stats.unchanged, stats.missing_service_lines
    );
    Ok(stats)
}

/// Archive held in memory, for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    service_lines: RwLock<HashMap<ServiceLineId, i64>>,
    usage: RwLock<HashMap<(i64, DailyDate), f64>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a service line known under the given row id
    pub async fn register_service_line(&self, service_line: ServiceLineId, row: i64) {
        self.service_lines.write().await.insert(service_line, row);
    }

    /// Number of stored `(row, date)` values
    pub async fn len(&self) -> usize {
        self.usage.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.usage.read().await.is_empty()
    }
}

#[async_trait]
impl UsageArchive for InMemoryArchive {
    async fn service_line_row(&self, service_line: &ServiceLineId) -> Result<Option<i64>> {
        Ok(self.service_lines.read().await.get(service_line).copied())
    }

    async fn stored_usage(&self, row: i64, date: DailyDate) -> Result<Option<f64>> {
        Ok(self.usage.read().await.get(&(row, date)).copied())
    }

    async fn insert_usage(&self, row: i64, date: DailyDate, consumed_gb: f64) -> Result<()> {
        self.usage.write().await.insert((row, date), consumed_gb);
        Ok(())
    }

    async fn update_usage(&self, row: i64, date: DailyDate, consumed_gb: f64) -> Result<()> {
        self.usage.write().await.insert((row, date), consumed_gb);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage_types::{CanonicalDailyUsage, ServiceLineUsageResult};

    fn day(date: &str, total: f64) -> CanonicalDailyUsage {
        CanonicalDailyUsage {
            date: date.parse().unwrap(),
            priority_gb: total,
            standard_gb: 0.0,
            total_gb: total,
        }
    }

    fn report(days: Vec<CanonicalDailyUsage>) -> UsageReport {
        let mut report = UsageReport::new();
        report.insert(
            ServiceLineId::new("SL-1"),
            ServiceLineUsageResult {
                daily_usage: days.into_iter().collect(),
                ..Default::default()
            },
        );
        report.insert(ServiceLineId::new("SL-unknown"), ServiceLineUsageResult::default());
        report
    }

    #[test]
    fn test_tolerance() {
        assert!(!differs(10.0, 10.005));
        assert!(!differs(10.0, 10.0));
        assert!(differs(10.0, 10.02));
        assert!(differs(10.02, 10.0));
    }

    #[tokio::test]
    async fn test_archive_is_idempotent() {
        let archive = InMemoryArchive::new();
        archive.register_service_line(ServiceLineId::new("SL-1"), 7).await;

        let first = report(vec![day("2025-01-01", 1.0), day("2025-01-02", 2.0)]);
        let stats = archive_usage(&archive, &first).await.unwrap();
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.missing_service_lines, 1);

        let stats = archive_usage(&archive, &first).await.unwrap();
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.unchanged, 2);
        assert_eq!(archive.len().await, 2);
    }

    #[tokio::test]
    async fn test_archive_updates_changed_days_only() {
        let archive = InMemoryArchive::new();
        archive.register_service_line(ServiceLineId::new("SL-1"), 7).await;
        archive_usage(&archive, &report(vec![day("2025-01-01", 1.0), day("2025-01-02", 2.0)]))
            .await
            .unwrap();

        let revised = report(vec![day("2025-01-01", 1.005), day("2025-01-02", 2.5)]);
        let stats = archive_usage(&archive, &revised).await.unwrap();

        assert_eq!(
            stats,
            ArchiveStats {
                inserted: 0,
                updated: 1,
                unchanged: 1,
                missing_service_lines: 1,
            }
        );
        let stored = archive
            .stored_usage(7, "2025-01-02".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(stored, Some(2.5));
    }
}
