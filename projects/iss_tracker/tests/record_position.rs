mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use diesel::ConnectionError;
use interfaces_open_notify_iss_now::index::OpenNotifyClient;
use projects_iss_tracker::{
    db::EstablishConnectionError,
    recorder::{invoke, record_position, InvocationResponse, RecordPositionError, RecordStage},
};

use common::{closed_addr, spawn_upstream, Ledger, MemoryStore, EXAMPLE_BODY};

fn client(url: String) -> OpenNotifyClient {
    OpenNotifyClient::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn stores_one_row_for_a_well_formed_response() {
    let source = client(spawn_upstream(StatusCode::OK, EXAMPLE_BODY).await);
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let response = invoke(&source, || Ok(MemoryStore::open(&ledger))).await;

    assert_eq!(
        response,
        InvocationResponse { status_code: 200, body: "Data inserted successfully".to_string() }
    );

    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.rows.len(), 1);
    assert_eq!(ledger.rows[0].timestamp, Some(1_700_000_000));
    assert_eq!(ledger.rows[0].latitude, Some(10.5));
    assert_eq!(ledger.rows[0].longitude, Some(-20.25));
    assert_eq!(ledger.opened, 1);
    assert_eq!(ledger.dropped, 1);
}

#[tokio::test]
async fn accepts_numeric_coordinates() {
    let body = r#"{"timestamp": 1700000060, "iss_position": {"latitude": -51.25, "longitude": 120}}"#;
    let source = client(spawn_upstream(StatusCode::OK, body).await);
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let row = record_position(&source, || Ok(MemoryStore::open(&ledger))).await.unwrap();

    assert_eq!(row.latitude, Some(-51.25));
    assert_eq!(row.longitude, Some(120.0));
}

#[tokio::test]
async fn missing_position_key_inserts_nothing() {
    let body = r#"{"message": "success", "timestamp": 1700000000}"#;
    let source = client(spawn_upstream(StatusCode::OK, body).await);
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let response = invoke(&source, || Ok(MemoryStore::open(&ledger))).await;

    assert_eq!(response, InvocationResponse::failure());
    let ledger = ledger.lock().unwrap();
    assert!(ledger.rows.is_empty());
    assert_eq!(ledger.dropped, 1);
}

#[tokio::test]
async fn network_failure_releases_the_connection() {
    let source = client(format!("http://{}/iss-now.json", closed_addr()));
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let err = record_position(&source, || Ok(MemoryStore::open(&ledger)))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), RecordStage::Fetch);
    assert!(matches!(err, RecordPositionError::Fetch { .. }));

    let ledger = ledger.lock().unwrap();
    assert!(ledger.rows.is_empty());
    assert_eq!(ledger.opened, 1);
    assert_eq!(ledger.dropped, 1);
}

#[tokio::test]
async fn upstream_error_status_is_a_failure() {
    let source = client(spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, "try later").await);
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let err = record_position(&source, || Ok(MemoryStore::open(&ledger)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RecordPositionError::UpstreamStatus { status } if status == StatusCode::SERVICE_UNAVAILABLE
    ));
    assert!(ledger.lock().unwrap().rows.is_empty());
}

#[tokio::test]
async fn insert_failure_leaves_no_row_and_releases_the_connection() {
    let source = client(spawn_upstream(StatusCode::OK, EXAMPLE_BODY).await);
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let err = record_position(&source, || Ok(MemoryStore::open_failing_inserts(&ledger)))
        .await
        .unwrap_err();
    assert_eq!(err.stage(), RecordStage::Storage);

    let response = invoke(&source, || Ok(MemoryStore::open_failing_inserts(&ledger))).await;
    assert_eq!(response, InvocationResponse::failure());

    let ledger = ledger.lock().unwrap();
    assert!(ledger.rows.is_empty());
    assert_eq!(ledger.opened, 2);
    assert_eq!(ledger.dropped, 2);
}

#[tokio::test]
async fn repeated_invocations_each_ensure_the_table() {
    let source = client(spawn_upstream(StatusCode::OK, EXAMPLE_BODY).await);
    let ledger = Arc::new(Mutex::new(Ledger::default()));

    let first = invoke(&source, || Ok(MemoryStore::open(&ledger))).await;
    let second = invoke(&source, || Ok(MemoryStore::open(&ledger))).await;

    assert!(first.is_success());
    assert!(second.is_success());

    // Same timestamp twice is allowed.
    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.ensure_calls, 2);
    assert_eq!(ledger.rows.len(), 2);
    assert_eq!(ledger.rows[0].timestamp, ledger.rows[1].timestamp);
    assert_eq!(ledger.dropped, 2);
}

#[tokio::test]
async fn connect_failure_is_reported_without_fetching() {
    let source = client(format!("http://{}/iss-now.json", closed_addr()));

    let err = record_position(&source, || {
        Err::<MemoryStore, _>(EstablishConnectionError::Connect {
            source: ConnectionError::BadConnection("connection refused".to_string()),
        })
    })
    .await
    .unwrap_err();

    assert_eq!(err.stage(), RecordStage::Connect);
}
