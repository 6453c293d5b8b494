//! Receipt record storage against a mocked backend.

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use receipt_cloud::{Gateway, ReceiptRecord, ReceiptStatus, ReceiptStore};

fn store(server: &MockServer) -> ReceiptStore {
    ReceiptStore::new(Gateway::new(server.uri(), "test-key"))
}

fn receipt_row(serial: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "serial_number": serial,
        "customer_name": name,
        "customer_phone": "13800138000",
        "membership_type": "gold",
        "amount": 1980.0,
        "contract_date": "2026-01-15",
        "status": "active",
    })
}

#[tokio::test]
async fn save_upserts_on_serial_number_with_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("on_conflict", "serial_number"))
        .and(body_partial_json(serde_json::json!({
            "serial_number": "2026-N-0001",
            "customer_name": "张三",
            "status": "active",
            "notes": "",
            "pdf_size": 0,
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let record = ReceiptRecord::new("2026-N-0001", "张三", "gold", 1980.0, "2026-01-15");
    store(&server).save(&record).await.unwrap();
}

#[tokio::test]
async fn get_by_serial_returns_none_when_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("serial_number", "eq.2026-N-0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            receipt_row("2026-N-0001", "张三"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("serial_number", "eq.2026-N-9999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let store = store(&server);

    let found = store.get_by_serial("2026-N-0001").await.unwrap().unwrap();
    assert_eq!(found.customer_name, "张三");
    assert_eq!(found.status, ReceiptStatus::Active);

    assert!(store.get_by_serial("2026-N-9999").await.unwrap().is_none());
}

#[tokio::test]
async fn recent_orders_newest_first_with_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            receipt_row("2026-N-0002", "李四"),
            receipt_row("2026-N-0001", "张三"),
        ])))
        .mount(&server)
        .await;

    let records = store(&server).recent(20).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].serial_number, "2026-N-0002");
}

#[tokio::test]
async fn search_matches_across_three_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param(
            "or",
            "(customer_name.ilike.*0007*,serial_number.ilike.*0007*,customer_phone.ilike.*0007*)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            receipt_row("2026-N-0007", "张三"),
        ])))
        .mount(&server)
        .await;

    let matches = store(&server).search("0007", 50).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].serial_number, "2026-N-0007");
}

#[tokio::test]
async fn update_status_patches_notes_only_when_given() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("serial_number", "eq.2026-N-0001"))
        .and(body_partial_json(serde_json::json!({
            "status": "cancelled",
            "notes": "customer refund",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .update_status("2026-N-0001", ReceiptStatus::Cancelled, Some("customer refund"))
        .await
        .unwrap();
}

#[tokio::test]
async fn statistics_folds_rows_client_side() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("select", "amount,status,created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "amount": 100, "status": "active", "created_at": "2026-01-01T00:00:00Z" },
            { "amount": 200, "status": "active", "created_at": "2026-01-02T00:00:00Z" },
            { "amount": "bad", "status": "cancelled", "created_at": "2026-01-03T00:00:00Z" },
        ])))
        .mount(&server)
        .await;

    let stats = store(&server).statistics(None, None).await.unwrap();
    assert_eq!(stats.total, 3);
    assert!((stats.total_amount - 300.0).abs() < f64::EPSILON);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.cancelled, 1);
    assert!((stats.average_amount - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn statistics_passes_inclusive_bounds() {
    let server = MockServer::start().await;
    let start = "2026-01-01T00:00:00+00:00";
    let end = "2026-01-31T00:00:00+00:00";

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("created_at", format!("gte.{start}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let stats = store(&server)
        .statistics(
            Some(start.parse().unwrap()),
            Some(end.parse().unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(stats.total, 0);
    assert!((stats.average_amount).abs() < f64::EPSILON);
}
