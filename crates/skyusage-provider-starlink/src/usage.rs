//! Billing-cycle usage fetcher
//!
//! Issues one billing-cycle query per call and reconciles the response.
//! Only the first page (50 service lines) is read; accounts with more
//! service lines get a truncated report and a warning.

use crate::client::StarlinkClient;
use serde_json::Value;
use skyusage_core::error::{Result, SkyusageError};
use skyusage_core::raw::{BillingCycleQuery, QueryResponse};
use skyusage_core::types::{AccountId, DailyDate, ServiceLineId};
use skyusage_core::usage_types::UsageReport;
use skyusage_core::{CycleSelection, Reconciler};
use tracing::{debug, info, warn};

/// Parameters of one usage fetch
#[derive(Debug, Clone, PartialEq)]
pub struct UsageQuery {
    pub account: AccountId,
    /// Restrict the provider response to these service lines
    pub service_lines: Option<Vec<ServiceLineId>>,
    /// Cycles to fetch, the current one included
    pub cycles_to_fetch: u32,
    /// Keep only the cycle(s) containing this date
    pub target_cycle_date: Option<DailyDate>,
}

impl UsageQuery {
    /// Current cycle of every service line of `account`
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            service_lines: None,
            cycles_to_fetch: 1,
            target_cycle_date: None,
        }
    }

    pub fn with_service_lines(mut self, service_lines: Vec<ServiceLineId>) -> Self {
        self.service_lines = Some(service_lines);
        self
    }

    pub fn with_cycles(mut self, cycles_to_fetch: u32) -> Self {
        self.cycles_to_fetch = cycles_to_fetch;
        self
    }

    pub fn with_target_cycle_date(mut self, date: DailyDate) -> Self {
        self.target_cycle_date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.account.is_blank() {
            return Err(SkyusageError::InvalidArgument(
                "account id must not be empty".into(),
            ));
        }
        if self.cycles_to_fetch == 0 {
            return Err(SkyusageError::InvalidArgument(
                "cycles to fetch must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Cycle selection policy implied by the query
    pub fn selection(&self) -> CycleSelection {
        CycleSelection::for_fetch(self.cycles_to_fetch, self.target_cycle_date)
    }

    fn body(&self) -> BillingCycleQuery {
        let filter: Option<Vec<String>> = self
            .service_lines
            .as_ref()
            .map(|lines| lines.iter().map(|l| l.as_str().to_string()).collect());
        BillingCycleQuery::first_page(self.cycles_to_fetch, filter.as_deref())
    }
}

fn billing_cycles_endpoint(account: &AccountId) -> String {
    let account = urlencoding::encode(account.as_str());
    format!("/enterprise/v1/accounts/{account}/billing-cycles/query")
}

pub struct UsageFetcher<'a> {
    client: &'a StarlinkClient,
}

impl<'a> UsageFetcher<'a> {
    pub(crate) fn new(client: &'a StarlinkClient) -> Self {
        Self { client }
    }

    /// Fetch and reconcile usage for every service line matched by `query`
    ///
    /// An empty response yields an empty report. Service lines the provider
    /// left out are simply absent from the report.
    pub async fn fetch(&self, query: &UsageQuery) -> Result<UsageReport> {
        query.validate()?;

        let endpoint = billing_cycles_endpoint(&query.account);
        let response: QueryResponse = self.client.post(&endpoint, &query.body()).await?;

        if response.is_truncated() {
            warn!(
                "Usage for account {} spans more than one page; using the first {} service lines",
                query.account,
                response.results().len()
            );
        }
        if response.results().is_empty() {
            info!("No usage data returned for account {}", query.account);
            return Ok(UsageReport::new());
        }

        debug!(
            "Reconciling {} service lines for account {}",
            response.results().len(),
            query.account
        );
        Ok(Reconciler::new(query.selection()).reconcile_response(&response))
    }

    /// Positional form of [`fetch`](Self::fetch)
    pub async fn fetch_and_reconcile(
        &self,
        account: AccountId,
        service_lines: Option<Vec<ServiceLineId>>,
        cycles_to_fetch: u32,
        target_cycle_date: Option<DailyDate>,
    ) -> Result<UsageReport> {
        let query = UsageQuery {
            account,
            service_lines,
            cycles_to_fetch,
            target_cycle_date,
        };
        self.fetch(&query).await
    }

    /// The billing-cycle query response, unprocessed
    pub async fn fetch_raw(&self, account: &AccountId, cycles_to_fetch: u32) -> Result<Value> {
        let query = UsageQuery::new(account.clone()).with_cycles(cycles_to_fetch);
        query.validate()?;
        self.client
            .post(&billing_cycles_endpoint(account), &query.body())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(UsageQuery::new(AccountId::new("")).validate().is_err());
        assert!(
            UsageQuery::new(AccountId::new("ACC-1"))
                .with_cycles(0)
                .validate()
                .is_err()
        );
        assert!(UsageQuery::new(AccountId::new("ACC-1")).validate().is_ok());
    }

    #[test]
    fn test_body_carries_filter() {
        let query = UsageQuery::new(AccountId::new("ACC-1"))
            .with_cycles(3)
            .with_service_lines(vec![ServiceLineId::new("SL-1"), ServiceLineId::new("SL-2")]);
        let body = query.body();
        assert_eq!(body.previous_billing_cycles, 2);
        assert_eq!(
            body.service_lines_filter,
            Some(vec!["SL-1".to_string(), "SL-2".to_string()])
        );
    }

    #[test]
    fn test_selection_follows_query() {
        let query = UsageQuery::new(AccountId::new("ACC-1"));
        assert_eq!(query.selection(), CycleSelection::Current);
        let date: DailyDate = "2025-01-15".parse().unwrap();
        assert_eq!(
            query.clone().with_cycles(6).with_target_cycle_date(date).selection(),
            CycleSelection::Containing(date)
        );
        assert_eq!(query.with_cycles(6).selection(), CycleSelection::All);
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            billing_cycles_endpoint(&AccountId::new("ACC-12345-67890-12")),
            "/enterprise/v1/accounts/ACC-12345-67890-12/billing-cycles/query"
        );
        assert_eq!(
            billing_cycles_endpoint(&AccountId::new("ACC-1/../x?y#z")),
            "/enterprise/v1/accounts/ACC-1%2F..%2Fx%3Fy%23z/billing-cycles/query"
        );
    }
}
