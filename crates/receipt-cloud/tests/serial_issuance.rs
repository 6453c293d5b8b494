//! Serial issuance against a mocked backend.

use chrono::{Datelike, Utc};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use receipt_cloud::{ClientError, ConflictPolicy, Gateway, SerialIssuer};

fn current_year() -> i32 {
    Utc::now().year()
}

fn issuer(server: &MockServer, policy: ConflictPolicy) -> SerialIssuer {
    SerialIssuer::with_policy(Gateway::new(server.uri(), "test-key"), policy)
}

fn serial_pattern_holds(serial: &str) {
    let (year, rest) = serial.split_once("-N-").expect("serial has -N- separator");
    assert_eq!(year.parse::<i32>().unwrap(), current_year());
    assert!(!rest.is_empty());
    assert!(rest.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn first_serial_of_a_year_starts_at_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .and(body_partial_json(serde_json::json!({
            "customer_name": "张三",
            "amount": 1980.0,
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::TimestampFallback);
    let serial = issuer.issue("张三", 1980.0).await.unwrap();

    serial_pattern_holds(&serial);
    assert_eq!(serial, format!("{}-N-0001", current_year()));
}

#[tokio::test]
async fn issuance_increments_latest_serial() {
    let server = MockServer::start().await;
    let year = current_year();

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "serial_number": format!("{year}-N-0007") },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .and(body_partial_json(serde_json::json!({
            "serial_number": format!("{year}-N-0008"),
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::TimestampFallback);
    let serial = issuer.issue("李四", 880.0).await.unwrap();
    assert_eq!(serial, format!("{year}-N-0008"));
}

#[tokio::test]
async fn suffix_widens_past_four_digits() {
    let server = MockServer::start().await;
    let year = current_year();

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "serial_number": format!("{year}-N-9999") },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::TimestampFallback);
    let serial = issuer.issue("", 0.0).await.unwrap();
    assert_eq!(serial, format!("{year}-N-10000"));
}

#[tokio::test]
async fn duplicate_key_degrades_to_timestamp_fallback() {
    let server = MockServer::start().await;
    let year = current_year();

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "serial_number": format!("{year}-N-0003") },
        ])))
        .mount(&server)
        .await;
    // The insert always collides; the issuer must not raise and must not
    // try to insert the fallback serial.
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "duplicate key value violates unique constraint",
            "code": "23505",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::TimestampFallback);
    let serial = issuer.issue("王五", 500.0).await.unwrap();

    serial_pattern_holds(&serial);
    let suffix = serial.rsplit('-').next().unwrap();
    assert_eq!(suffix.len(), 4, "fallback suffix is exactly four digits");
}

#[tokio::test]
async fn backend_outage_also_degrades_to_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "internal error",
        })))
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::TimestampFallback);
    let serial = issuer.issue("", 0.0).await.unwrap();
    serial_pattern_holds(&serial);
}

#[tokio::test]
async fn retry_policy_rereads_after_conflict() {
    let server = MockServer::start().await;
    let year = current_year();

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "serial_number": format!("{year}-N-0010") },
        ])))
        .mount(&server)
        .await;
    // First insert collides, second (after re-read) succeeds.
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505", "message": "duplicate key",
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::Retry { max_attempts: 3 });
    let serial = issuer.issue("", 0.0).await.unwrap();
    assert_eq!(serial, format!("{year}-N-0011"));
}

#[tokio::test]
async fn retry_policy_surfaces_exhausted_conflicts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/serial_numbers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505", "message": "duplicate key",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::Retry { max_attempts: 2 });
    let result = issuer.issue("", 0.0).await;
    assert!(matches!(
        result,
        Err(ClientError::SerialConflict { attempts: 2 })
    ));
}

#[tokio::test]
async fn exists_distinguishes_absent_from_present() {
    let server = MockServer::start().await;
    let year = current_year();

    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param(
            "serial_number",
            format!("eq.{year}-N-0001"),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "serial_number": format!("{year}-N-0001") },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/serial_numbers"))
        .and(query_param(
            "serial_number",
            format!("eq.{year}-N-9999"),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let issuer = issuer(&server, ConflictPolicy::TimestampFallback);
    assert!(issuer.exists(&format!("{year}-N-0001")).await.unwrap());
    assert!(!issuer.exists(&format!("{year}-N-9999")).await.unwrap());
}
