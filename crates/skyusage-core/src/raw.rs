//! Provider wire format
//!
//! Request and response shapes of the billing-cycle query endpoint. Every
//! response field is optional: a missing or `null` number counts as zero and
//! a missing list as empty, so a malformed payload reconciles to an all-zero
//! result instead of failing.

use serde::{Deserialize, Serialize};

/// Fixed page size of the billing-cycle query
pub const PAGE_LIMIT: u32 = 50;

/// Request body of `POST /enterprise/v1/accounts/{account}/billing-cycles/query`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCycleQuery {
    /// Number of cycles before the current one; the current cycle is implicit
    pub previous_billing_cycles: u32,
    pub page_limit: u32,
    pub page_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_lines_filter: Option<Vec<String>>,
}

impl BillingCycleQuery {
    /// Build the first-page query for `cycles_to_fetch` cycles (current included)
    ///
    /// An empty service line filter is treated as no filter.
    pub fn first_page(cycles_to_fetch: u32, service_lines: Option<&[String]>) -> Self {
        Self {
            previous_billing_cycles: cycles_to_fetch.saturating_sub(1),
            page_limit: PAGE_LIMIT,
            page_index: 0,
            service_lines_filter: service_lines
                .filter(|lines| !lines.is_empty())
                .map(<[String]>::to_vec),
        }
    }
}

/// Paged envelope returned by the enterprise API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub content: Option<QueryContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContent {
    #[serde(default)]
    pub results: Option<Vec<RawServiceLineUsage>>,
    #[serde(default)]
    pub is_last_page: Option<bool>,
}

impl QueryResponse {
    /// Service line entries of the page, empty when absent
    pub fn results(&self) -> &[RawServiceLineUsage] {
        self.content
            .as_ref()
            .and_then(|c| c.results.as_deref())
            .unwrap_or_default()
    }

    /// Whether the provider reported further pages that were not fetched
    pub fn is_truncated(&self) -> bool {
        self.content
            .as_ref()
            .and_then(|c| c.is_last_page)
            .is_some_and(|last| !last)
    }
}

/// Usage of one service line across the requested billing cycles
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawServiceLineUsage {
    #[serde(default)]
    pub service_line_number: Option<String>,
    #[serde(default)]
    pub billing_cycles: Option<Vec<RawBillingCycle>>,
}

impl RawServiceLineUsage {
    pub fn cycles(&self) -> &[RawBillingCycle] {
        self.billing_cycles.as_deref().unwrap_or_default()
    }
}

/// One billing cycle as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBillingCycle {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub data_pool_usage: Option<Vec<RawDataPool>>,
    #[serde(default)]
    pub daily_data_usage: Option<Vec<RawDailyEntry>>,
}

impl RawBillingCycle {
    pub fn start_date(&self) -> &str {
        self.start_date.as_deref().unwrap_or_default()
    }

    pub fn end_date(&self) -> &str {
        self.end_date.as_deref().unwrap_or_default()
    }

    pub fn data_pools(&self) -> &[RawDataPool] {
        self.data_pool_usage.as_deref().unwrap_or_default()
    }

    pub fn daily_entries(&self) -> &[RawDailyEntry] {
        self.daily_data_usage.as_deref().unwrap_or_default()
    }

    /// Sum of `totalAmountGB` over every block of every pool
    pub fn cap_gb(&self) -> f64 {
        self.blocks().map(RawDataBlock::total_gb).sum()
    }

    /// Sum of `consumedAmountGB` over every block of every pool
    pub fn consumed_gb(&self) -> f64 {
        self.blocks().map(RawDataBlock::consumed_gb).sum()
    }

    fn blocks(&self) -> impl Iterator<Item = &RawDataBlock> {
        self.data_pools().iter().flat_map(RawDataPool::blocks)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataPool {
    #[serde(default)]
    pub data_blocks: Option<Vec<RawDataBlock>>,
}

impl RawDataPool {
    pub fn blocks(&self) -> &[RawDataBlock] {
        self.data_blocks.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataBlock {
    #[serde(default, rename = "totalAmountGB")]
    pub total_amount_gb: Option<f64>,
    #[serde(default, rename = "consumedAmountGB")]
    pub consumed_amount_gb: Option<f64>,
}

impl RawDataBlock {
    pub fn total_gb(&self) -> f64 {
        self.total_amount_gb.unwrap_or_default()
    }

    pub fn consumed_gb(&self) -> f64 {
        self.consumed_amount_gb.unwrap_or_default()
    }
}

/// One day of usage inside a billing cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDailyEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "priorityGB")]
    pub priority_gb: Option<f64>,
    #[serde(default, rename = "optInPriorityGB")]
    pub opt_in_priority_gb: Option<f64>,
    #[serde(default, rename = "standardGB")]
    pub standard_gb: Option<f64>,
    #[serde(default, rename = "nonBillableGB")]
    pub non_billable_gb: Option<f64>,
}

impl RawDailyEntry {
    pub fn date(&self) -> &str {
        self.date.as_deref().unwrap_or_default()
    }

    pub fn priority(&self) -> f64 {
        self.priority_gb.unwrap_or_default()
    }

    pub fn opt_in_priority(&self) -> f64 {
        self.opt_in_priority_gb.unwrap_or_default()
    }

    pub fn standard(&self) -> f64 {
        self.standard_gb.unwrap_or_default()
    }

    pub fn non_billable(&self) -> f64 {
        self.non_billable_gb.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_body_shape() {
        let lines = vec!["SL-1".to_string()];
        let body = serde_json::to_value(BillingCycleQuery::first_page(3, Some(&lines))).unwrap();
        assert_eq!(
            body,
            json!({
                "previousBillingCycles": 2,
                "pageLimit": 50,
                "pageIndex": 0,
                "serviceLinesFilter": ["SL-1"],
            })
        );
    }

    #[test]
    fn test_empty_filter_is_omitted() {
        let body = serde_json::to_value(BillingCycleQuery::first_page(1, Some(&[]))).unwrap();
        assert_eq!(body["previousBillingCycles"], 0);
        assert!(body.get("serviceLinesFilter").is_none());
    }

    #[test]
    fn test_nulls_and_missing_fields_default_to_zero() {
        let cycle: RawBillingCycle = serde_json::from_value(json!({
            "startDate": "2024-12-01T00:00:00Z",
            "dataPoolUsage": [
                {"dataBlocks": [{"totalAmountGB": 50.0, "consumedAmountGB": null}]},
                {"dataBlocks": null},
                {}
            ],
            "dailyDataUsage": [{"date": "2024-12-02", "priorityGB": null}]
        }))
        .unwrap();

        assert_eq!(cycle.cap_gb(), 50.0);
        assert_eq!(cycle.consumed_gb(), 0.0);
        assert_eq!(cycle.end_date(), "");
        let day = &cycle.daily_entries()[0];
        assert_eq!(day.priority(), 0.0);
        assert_eq!(day.standard(), 0.0);
    }

    #[test]
    fn test_empty_envelope() {
        let response: QueryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.results().is_empty());
        assert!(!response.is_truncated());

        let response: QueryResponse =
            serde_json::from_value(json!({"content": {"results": [], "isLastPage": false}}))
                .unwrap();
        assert!(response.is_truncated());
    }
}
