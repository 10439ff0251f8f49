//! End-to-end batch tests against mocked provider and spreadsheet backends.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use revagg_pipeline::{AggregationService, ErrorKind, FetchOutcome, PersistStatus};
use revagg_provider::ProviderClient;
use revagg_sheets::SheetsClient;

const BOOKING_ONE: &str = "https://www.booking.com/hotel/in/hotel-one.html";
const TRIPADVISOR_TWO: &str =
    "https://www.tripadvisor.com/Hotel_Review-g304556-d123-Reviews-Hotel_Two-Chennai.html";

fn service(
    provider_uri: &str,
    sheets_uri: &str,
    timeout_secs: u64,
    persist_sparse_records: bool,
) -> AggregationService {
    let provider = ProviderClient::with_base_url(
        "test-key",
        timeout_secs,
        "revagg-test/0.1",
        0,
        10,
        provider_uri,
    )
    .expect("failed to build test ProviderClient");
    let sheets = SheetsClient::with_base_url(
        "sheet-1",
        "AggregatedData",
        "test-token",
        5,
        "revagg-test/0.1",
        sheets_uri,
    )
    .expect("failed to build test SheetsClient");
    AggregationService::new(provider, sheets, 4, persist_sparse_records)
}

fn hotels_payload(name: &str) -> serde_json::Value {
    json!({
        "properties": [{
            "name": name,
            "overall_rating": 4.5,
            "reviews": 1200,
            "address": "1 Seaside Road, Chennai",
            "link": "https://example.com/hotel",
            "phone": "+91 44 1234 5678",
            "reviews_breakdown": {
                "user_reviews": {
                    "reviews": [{ "snippet": "Great stay, would return." }]
                }
            }
        }]
    })
}

#[tokio::test]
async fn mixed_batch_reports_every_input_and_persists_successes() {
    let provider_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "hotel one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hotels_payload("Hotel One")))
        .expect(1)
        .mount(&provider_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Hotel Two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hotels_payload("Hotel Two")))
        .expect(1)
        .mount(&provider_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/AggregatedData:append"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sheets_server)
        .await;

    let service = service(&provider_server.uri(), &sheets_server.uri(), 30, true);
    let result = service
        .run(vec![
            BOOKING_ONE.to_owned(),
            "not-a-url".to_owned(),
            TRIPADVISOR_TWO.to_owned(),
        ])
        .await;

    assert_eq!(result.outcomes.len(), 3);
    assert!(result.outcomes[0].is_success());
    assert!(matches!(
        result.outcomes[1],
        FetchOutcome::Failed { kind: ErrorKind::Unclassified, .. }
    ));
    assert!(result.outcomes[2].is_success());

    let names: Vec<&str> = result
        .outcomes
        .iter()
        .filter_map(|o| o.record().map(|r| r.hotel_name.as_str()))
        .collect();
    assert_eq!(names, vec!["Hotel One", "Hotel Two"]);

    assert_eq!(result.persistence.len(), 2);
    for report in &result.persistence {
        assert_eq!(report.status, PersistStatus::Appended, "{report:?}");
    }

    assert_eq!(result.summary.submitted, 3);
    assert_eq!(result.summary.succeeded, 2);
    assert_eq!(result.summary.failed, 1);
    assert_eq!(result.summary.persisted, 2);
}

#[tokio::test]
async fn slow_provider_times_out_one_item_without_blocking_the_rest() {
    let provider_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "slow hotel"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hotels_payload("Slow Hotel"))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&provider_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "hotel one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hotels_payload("Hotel One")))
        .mount(&provider_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Hotel Two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hotels_payload("Hotel Two")))
        .mount(&provider_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/AggregatedData:append"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sheets_server)
        .await;

    let service = service(&provider_server.uri(), &sheets_server.uri(), 1, true);
    let result = service
        .run(vec![
            "https://www.booking.com/hotel/in/slow-hotel.html".to_owned(),
            BOOKING_ONE.to_owned(),
            TRIPADVISOR_TWO.to_owned(),
        ])
        .await;

    assert!(matches!(
        result.outcomes[0],
        FetchOutcome::Failed { kind: ErrorKind::Timeout, .. }
    ));
    assert!(result.outcomes[1].is_success());
    assert!(result.outcomes[2].is_success());
    assert_eq!(result.summary.persisted, 2);
}

#[tokio::test]
async fn sparse_records_are_withheld_when_the_policy_disallows_them() {
    let provider_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;

    // Name only: no rating, count, contact fields, or snippets.
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": [{ "name": "Bare Hotel" }]
        })))
        .expect(1)
        .mount(&provider_server)
        .await;

    let service = service(&provider_server.uri(), &sheets_server.uri(), 30, false);
    let result = service.run(vec![BOOKING_ONE.to_owned()]).await;

    assert!(result.outcomes[0].is_success(), "fetch itself succeeds");
    assert_eq!(result.persistence.len(), 1);
    assert_eq!(result.persistence[0].status, PersistStatus::Skipped);
    assert_eq!(result.summary.persisted, 0);

    let sheet_requests = sheets_server.received_requests().await.unwrap_or_default();
    assert!(
        sheet_requests.is_empty(),
        "no append traffic expected for an all-sparse batch"
    );
}
