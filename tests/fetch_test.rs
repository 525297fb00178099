//! End-to-end usage fetches against a mock provider

mod common;

use common::*;
use serde_json::json;
use skyusage_core::SkyusageError;
use skyusage_core::types::{AccountId, DailyDate, ServiceLineId};
use skyusage_provider_starlink::{RetryPolicy, UsageQuery};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> UsageQuery {
    UsageQuery::new(AccountId::new(TEST_ACCOUNT))
}

#[tokio::test]
async fn test_current_cycle_request_body_and_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(query_path()))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "previousBillingCycles": 0,
            "pageLimit": 50,
            "pageIndex": 0,
            "serviceLinesFilter": ["SL-123-456-78"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-123-456-78",
            vec![december_cycle().build()],
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let report = mock_client(&server)
        .usage()
        .fetch(&query().with_service_lines(vec![ServiceLineId::new("SL-123-456-78")]))
        .await
        .unwrap();

    let usage = &report[&ServiceLineId::new("SL-123-456-78")];
    assert_eq!(usage.total_cap_gb, 50.0);
    assert_eq!(usage.total_consumed_gb, 46.0);
    assert_eq!(usage.billing_cycle_start_date, Some("2024-12-01".parse().unwrap()));
    assert_eq!(usage.billing_cycle_end_date, Some("2024-12-31".parse().unwrap()));

    let days: Vec<_> = usage.daily_usage.iter().collect();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].priority_gb, 5.0);
    assert_eq!(days[0].total_gb, 6.0);
    assert_eq!(days[1].priority_gb, 2.0);
    assert_eq!(days[1].total_gb, 2.5);
}

#[tokio::test]
async fn test_multiple_cycles_accumulate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(query_path()))
        .and(body_json(json!({
            "previousBillingCycles": 1,
            "pageLimit": 50,
            "pageIndex": 0,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-1",
            vec![december_cycle().build(), november_cycle().build()],
        )])))
        .mount(&server)
        .await;

    let report = mock_client(&server)
        .usage()
        .fetch(&query().with_cycles(2))
        .await
        .unwrap();

    let usage = &report[&ServiceLineId::new("SL-1")];
    assert_eq!(usage.total_cap_gb, 150.0);
    assert_eq!(usage.total_consumed_gb, 146.0);
    assert_eq!(usage.daily_usage.len(), 3);
    // window stays on the first (current) cycle
    assert_eq!(usage.billing_cycle_start_date, Some("2024-12-01".parse().unwrap()));
}

#[tokio::test]
async fn test_target_date_keeps_only_matching_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-1",
            vec![december_cycle().build(), november_cycle().build()],
        )])))
        .mount(&server)
        .await;

    let target: DailyDate = "2024-11-15".parse().unwrap();
    let report = mock_client(&server)
        .usage()
        .fetch(&query().with_cycles(2).with_target_cycle_date(target))
        .await
        .unwrap();

    let usage = &report[&ServiceLineId::new("SL-1")];
    assert_eq!(usage.total_cap_gb, 100.0);
    assert_eq!(usage.total_consumed_gb, 100.0);
    assert_eq!(usage.daily_usage.len(), 1);
    assert_eq!(usage.billing_cycle_start_date, Some("2024-11-01".parse().unwrap()));
}

#[tokio::test]
async fn test_target_date_outside_every_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-1",
            vec![december_cycle().build()],
        )])))
        .mount(&server)
        .await;

    let report = mock_client(&server)
        .usage()
        .fetch(&query().with_cycles(3).with_target_cycle_date("2023-06-01".parse().unwrap()))
        .await
        .unwrap();

    let usage = &report[&ServiceLineId::new("SL-1")];
    assert!(usage.daily_usage.is_empty());
    assert_eq!(usage.total_cap_gb, 0.0);
    assert!(usage.billing_cycle_start_date.is_none());
}

#[tokio::test]
async fn test_empty_results_give_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": {"results": []}})))
        .mount(&server)
        .await;

    let report = mock_client(&server).usage().fetch(&query()).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_missing_content_gives_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let report = mock_client(&server).usage().fetch(&query()).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_truncated_page_is_still_reconciled() {
    let server = MockServer::start().await;
    let mut body = response_body(vec![("SL-1", vec![december_cycle().build()])]);
    body["content"]["isLastPage"] = json!(false);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let report = mock_client(&server).usage().fetch(&query()).await.unwrap();
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn test_http_error_is_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let err = mock_client(&server).usage().fetch(&query()).await.unwrap_err();
    assert!(matches!(err, SkyusageError::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_invalid_query_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client.usage().fetch(&query().with_cycles(0)).await.unwrap_err();
    assert!(matches!(err, SkyusageError::InvalidArgument(_)));

    let blank = UsageQuery::new(AccountId::new("  "));
    assert!(client.usage().fetch(&blank).await.is_err());
}

#[tokio::test]
async fn test_server_errors_are_retried_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-1",
            vec![december_cycle().build()],
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let retry = RetryPolicy {
        initial_delay_ms: 1,
        max_delay_ms: 5,
        ..RetryPolicy::default().with_max_retries(2)
    };
    let report = mock_client_with_retry(&server, retry)
        .usage()
        .fetch(&query())
        .await
        .unwrap();
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn test_positional_fetch_matches_query_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-1",
            vec![december_cycle().build(), november_cycle().build()],
        )])))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let positional = client
        .usage()
        .fetch_and_reconcile(AccountId::new(TEST_ACCOUNT), None, 2, None)
        .await
        .unwrap();
    let builder = client.usage().fetch(&query().with_cycles(2)).await.unwrap();
    assert_eq!(positional, builder);
}

#[tokio::test]
async fn test_raw_fetch_returns_body_unchanged() {
    let server = MockServer::start().await;
    let body = response_body(vec![("SL-1", vec![december_cycle().build()])]);
    Mock::given(method("POST"))
        .and(path(query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let raw = mock_client(&server)
        .usage()
        .fetch_raw(&AccountId::new(TEST_ACCOUNT), 1)
        .await
        .unwrap();
    assert_eq!(raw, body);
}

#[tokio::test]
async fn test_account_id_cannot_escape_its_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/enterprise/v1/accounts/ACC%2F1%3Fpage%3D2/billing-cycles/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body(vec![(
            "SL-1",
            vec![december_cycle().build()],
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let report = mock_client(&server)
        .usage()
        .fetch(&UsageQuery::new(AccountId::new("ACC/1?page=2")))
        .await
        .unwrap();
    assert_eq!(report.len(), 1);
}
