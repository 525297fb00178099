//! Common fixtures for skyusage integration tests
//!
//! Builders produce provider-shaped JSON so the same fixture can be served
//! by a mock server or decoded straight into the raw types.

#![allow(dead_code)]

use serde_json::{Value, json};
use skyusage_core::raw::{QueryResponse, RawBillingCycle};
use skyusage_provider_starlink::{RetryPolicy, StarlinkClient, StaticToken};
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_ACCOUNT: &str = "ACC-12345-67890-12";

/// Endpoint path of the billing-cycle query for [`TEST_ACCOUNT`]
pub fn query_path() -> String {
    format!("/enterprise/v1/accounts/{TEST_ACCOUNT}/billing-cycles/query")
}

/// Builder for one provider daily entry
pub struct DayBuilder {
    date: String,
    priority: f64,
    opt_in: f64,
    standard: f64,
    non_billable: f64,
}

impl DayBuilder {
    pub fn new(date: &str) -> Self {
        Self {
            date: format!("{date}T00:00:00Z"),
            priority: 0.0,
            opt_in: 0.0,
            standard: 0.0,
            non_billable: 0.0,
        }
    }

    pub fn priority(mut self, gb: f64) -> Self {
        self.priority = gb;
        self
    }

    pub fn opt_in(mut self, gb: f64) -> Self {
        self.opt_in = gb;
        self
    }

    pub fn standard(mut self, gb: f64) -> Self {
        self.standard = gb;
        self
    }

    pub fn non_billable(mut self, gb: f64) -> Self {
        self.non_billable = gb;
        self
    }

    pub fn build(self) -> Value {
        json!({
            "date": self.date,
            "priorityGB": self.priority,
            "optInPriorityGB": self.opt_in,
            "standardGB": self.standard,
            "nonBillableGB": self.non_billable,
        })
    }
}

/// Builder for one provider billing cycle
pub struct CycleBuilder {
    start: String,
    end: String,
    blocks: Vec<(f64, f64)>,
    days: Vec<Value>,
}

impl CycleBuilder {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: format!("{start}T00:00:00Z"),
            end: format!("{end}T00:00:00Z"),
            blocks: Vec::new(),
            days: Vec::new(),
        }
    }

    /// Add a data block of `total` GB of which `consumed` GB were used
    pub fn block(mut self, total: f64, consumed: f64) -> Self {
        self.blocks.push((total, consumed));
        self
    }

    pub fn day(mut self, day: DayBuilder) -> Self {
        self.days.push(day.build());
        self
    }

    pub fn build(self) -> Value {
        let blocks: Vec<Value> = self
            .blocks
            .into_iter()
            .map(|(total, consumed)| json!({"totalAmountGB": total, "consumedAmountGB": consumed}))
            .collect();
        json!({
            "startDate": self.start,
            "endDate": self.end,
            "dataPoolUsage": [{"dataBlocks": blocks}],
            "dailyDataUsage": self.days,
        })
    }

    pub fn raw(self) -> RawBillingCycle {
        serde_json::from_value(self.build()).unwrap()
    }
}

/// A query response body with the given `(service line, cycles)` results
pub fn response_body(lines: Vec<(&str, Vec<Value>)>) -> Value {
    let results: Vec<Value> = lines
        .into_iter()
        .map(|(line, cycles)| json!({"serviceLineNumber": line, "billingCycles": cycles}))
        .collect();
    json!({
        "content": {
            "totalCount": results.len(),
            "isLastPage": true,
            "results": results,
        }
    })
}

pub fn decode_response(body: Value) -> QueryResponse {
    serde_json::from_value(body).unwrap()
}

/// December 2024 cycle used throughout: 50 GB cap, 46 GB consumed
pub fn december_cycle() -> CycleBuilder {
    CycleBuilder::new("2024-12-01", "2024-12-31")
        .block(50.0, 46.0)
        .day(DayBuilder::new("2024-12-15").priority(5.0).opt_in(5.0).standard(1.0))
        .day(DayBuilder::new("2024-12-16").priority(2.004).standard(0.5))
}

/// November 2024 cycle: 100 GB cap, 100 GB consumed
pub fn november_cycle() -> CycleBuilder {
    CycleBuilder::new("2024-11-01", "2024-11-30")
        .block(100.0, 100.0)
        .day(DayBuilder::new("2024-11-20").priority(3.0).standard(2.0))
}

/// Client pointed at `server` with a static token
pub fn mock_client(server: &MockServer) -> StarlinkClient {
    mock_client_with_retry(server, RetryPolicy::disabled())
}

pub fn mock_client_with_retry(server: &MockServer, retry: RetryPolicy) -> StarlinkClient {
    StarlinkClient::builder(Arc::new(StaticToken::new("test-token")))
        .base_url(server.uri())
        .retry(retry)
        .build()
        .unwrap()
}
