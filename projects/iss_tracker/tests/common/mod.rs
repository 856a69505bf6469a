#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{http::StatusCode, routing::get, Router};
use diesel::result::DatabaseErrorKind;
use projects_iss_tracker::{
    db::iss_position::{
        models::{IssPosition, NewIssPosition},
        queries::{EnsureIssPositionTableError, InsertIssPositionError},
    },
    recorder::PositionStore,
};

pub const EXAMPLE_BODY: &str =
    r#"{"message": "success", "timestamp": 1700000000, "iss_position": {"latitude": "10.5", "longitude": "-20.25"}}"#;

/// Serves `body` with `status` at `/iss-now.json` and returns that URL.
pub async fn spawn_upstream(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route("/iss-now.json", get(move || async move { (status, body) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/iss-now.json")
}

/// An address nothing is listening on.
pub fn closed_addr() -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

#[derive(Debug, Default)]
pub struct Ledger {
    pub rows: Vec<IssPosition>,
    pub ensure_calls: usize,
    pub opened: usize,
    pub dropped: usize,
}

/// In-memory stand-in for a Postgres connection.
pub struct MemoryStore {
    ledger: Arc<Mutex<Ledger>>,
    fail_insert: bool,
}

impl MemoryStore {
    pub fn open(ledger: &Arc<Mutex<Ledger>>) -> Self {
        ledger.lock().unwrap().opened += 1;
        Self { ledger: ledger.clone(), fail_insert: false }
    }

    pub fn open_failing_inserts(ledger: &Arc<Mutex<Ledger>>) -> Self {
        let mut store = Self::open(ledger);
        store.fail_insert = true;
        store
    }
}

impl PositionStore for MemoryStore {
    fn ensure_table(&mut self) -> Result<(), EnsureIssPositionTableError> {
        self.ledger.lock().unwrap().ensure_calls += 1;
        Ok(())
    }

    fn insert_sample(&mut self, new: &NewIssPosition) -> Result<IssPosition, InsertIssPositionError> {
        if self.fail_insert {
            return Err(InsertIssPositionError::InsertIssPosition {
                source: diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::CheckViolation,
                    Box::new(String::from("new row violates check constraint")),
                ),
            });
        }

        let mut ledger = self.ledger.lock().unwrap();
        let row = IssPosition {
            id: ledger.rows.len() as i32 + 1,
            timestamp: Some(new.timestamp),
            latitude: Some(new.latitude),
            longitude: Some(new.longitude),
        };
        ledger.rows.push(row.clone());
        Ok(row)
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.dropped += 1;
        }
    }
}
