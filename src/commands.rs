//! Command execution
//!
//! Each subcommand resolves to a single rendered string so `main` only has
//! to print it.

use crate::cli::{Command, UsageArgs};
use skyusage_core::error::Result;
use skyusage_core::filters::DateRangeFilter;
use skyusage_core::types::{AccountId, ServiceLineId};
use skyusage_core::usage_types::UsageReport;
use skyusage_provider_starlink::{StarlinkClient, UsageQuery};
use skyusage_terminal::OutputFormatter;
use tracing::{info, warn};

impl UsageArgs {
    /// Provider query described by these arguments
    pub fn to_query(&self) -> UsageQuery {
        let mut query =
            UsageQuery::new(AccountId::new(self.account.trim())).with_cycles(self.cycles);
        if !self.service_lines.is_empty() {
            query = query.with_service_lines(
                self.service_lines.iter().map(|l| ServiceLineId::new(l.trim())).collect(),
            );
        }
        if let Some(date) = self.target_date {
            query = query.with_target_cycle_date(date);
        }
        query
    }

    pub fn date_filter(&self) -> DateRangeFilter {
        DateRangeFilter {
            since: self.since,
            until: self.until,
        }
    }
}

/// Fetch, reconcile and filter usage for the requested service lines
pub async fn usage_report(client: &StarlinkClient, args: &UsageArgs) -> Result<UsageReport> {
    let query = args.to_query();
    let report = client.usage().fetch(&query).await?;

    if let Some(requested) = &query.service_lines {
        for line in requested.iter().filter(|l| !report.contains_key(*l)) {
            warn!("Service line {} not found in usage data", line);
        }
    }

    let filter = args.date_filter();
    if filter.is_empty() {
        return Ok(report);
    }
    let before = report.len();
    let report = filter.apply(report);
    if report.len() < before {
        info!(
            "{} service lines had no usage inside the date range",
            before - report.len()
        );
    }
    Ok(report)
}

/// Run `command` and render its result
pub async fn run(
    client: &StarlinkClient,
    command: &Command,
    formatter: &dyn OutputFormatter,
) -> Result<String> {
    match command {
        Command::Accounts => {
            let accounts = client.accounts().list_accounts().await?;
            info!("Found {} accounts", accounts.len());
            Ok(formatter.format_value(&serde_json::Value::Array(accounts)))
        }
        Command::Terminals { account } => {
            let lines = client
                .service_lines()
                .list_service_lines(&AccountId::new(account.trim()))
                .await?;
            info!("Found {} service lines for account {}", lines.len(), account);
            Ok(formatter.format_value(&serde_json::Value::Array(lines)))
        }
        Command::Details {
            account,
            service_line,
        } => {
            let details = client
                .service_lines()
                .get_service_line(
                    &AccountId::new(account.trim()),
                    &ServiceLineId::new(service_line.trim()),
                )
                .await?;
            Ok(formatter.format_value(&details))
        }
        Command::Usage(args) => {
            let report = usage_report(client, args).await?;
            Ok(formatter.format_usage(&report))
        }
        Command::Raw { account, cycles } => {
            let raw = client
                .usage()
                .fetch_raw(&AccountId::new(account.trim()), *cycles)
                .await?;
            Ok(formatter.format_value(&raw))
        }
    }
}
