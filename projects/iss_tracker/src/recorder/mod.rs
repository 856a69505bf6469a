//! One invocation: connect, ensure the table, fetch, parse, insert.
//!
//! `record_position` keeps the typed failure, `invoke` flattens it into the
//! `{statusCode, body}` reply and logs which stage failed.

pub mod response;
pub mod source;
pub mod store;

use std::fmt;
use std::num::{ParseFloatError, TryFromIntError};

use interfaces_open_notify_iss_now::{
    index::{FetchIssNowError, IssNowResult},
    models::{IssNowResponse, TimestampValueError},
};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::db::{
    iss_position::{
        models::{IssPosition, NewIssPosition},
        queries::{EnsureIssPositionTableError, InsertIssPositionError},
    },
    EstablishConnectionError,
};

pub use response::InvocationResponse;
pub use source::PositionSource;
pub use store::PositionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStage {
    Connect,
    Schema,
    Fetch,
    Parse,
    Storage,
}

impl RecordStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStage::Connect => "connect",
            RecordStage::Schema => "schema",
            RecordStage::Fetch => "fetch",
            RecordStage::Parse => "parse",
            RecordStage::Storage => "storage",
        }
    }
}

impl fmt::Display for RecordStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RecordPositionError {
    #[error("Connect: {source}")]
    Connect {
        source: EstablishConnectionError,
    },

    #[error("EnsureTable: {source}")]
    EnsureTable {
        source: EnsureIssPositionTableError,
    },

    #[error("FetchIssNow: {source}")]
    Fetch {
        source: FetchIssNowError,
    },

    #[error("UpstreamStatus: {status}")]
    UpstreamStatus {
        status: StatusCode,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        source: serde_json::Error,
    },

    #[error("UnreadableTimestamp: {source}")]
    UnreadableTimestamp {
        source: TimestampValueError,
    },

    #[error("InvalidTimestamp: {value}: {source}")]
    InvalidTimestamp {
        value: i64,
        source: TryFromIntError,
    },

    #[error("InvalidCoordinate: {field}: {source}")]
    InvalidCoordinate {
        field: &'static str,
        source: ParseFloatError,
    },

    #[error("InsertSample: {source}")]
    InsertSample {
        source: InsertIssPositionError,
    },
}

impl RecordPositionError {
    pub fn stage(&self) -> RecordStage {
        match self {
            RecordPositionError::Connect { .. } => RecordStage::Connect,
            RecordPositionError::EnsureTable { .. } => RecordStage::Schema,
            RecordPositionError::Fetch { .. } | RecordPositionError::UpstreamStatus { .. } => {
                RecordStage::Fetch
            }
            RecordPositionError::DeserializeResponseBody { .. }
            | RecordPositionError::UnreadableTimestamp { .. }
            | RecordPositionError::InvalidTimestamp { .. }
            | RecordPositionError::InvalidCoordinate { .. } => RecordStage::Parse,
            RecordPositionError::InsertSample { .. } => RecordStage::Storage,
        }
    }
}

/// Turns an `iss-now.json` body into a row ready for insertion.
pub fn parse_iss_now(body: &str) -> Result<NewIssPosition, RecordPositionError> {
    let parsed: IssNowResponse = serde_json::from_str(body)
        .map_err(|source| RecordPositionError::DeserializeResponseBody { source })?;

    let epoch_secs = parsed
        .timestamp
        .to_i64()
        .map_err(|source| RecordPositionError::UnreadableTimestamp { source })?;

    let timestamp = i32::try_from(epoch_secs)
        .map_err(|source| RecordPositionError::InvalidTimestamp { value: epoch_secs, source })?;

    let latitude = parsed
        .iss_position
        .latitude
        .to_f64()
        .map_err(|source| RecordPositionError::InvalidCoordinate { field: "latitude", source })?;

    let longitude = parsed
        .iss_position
        .longitude
        .to_f64()
        .map_err(|source| RecordPositionError::InvalidCoordinate { field: "longitude", source })?;

    Ok(NewIssPosition { timestamp, latitude, longitude })
}

/// Runs one invocation. The store returned by `connect` is dropped, and its
/// connection closed, before this returns on every path.
pub async fn record_position<Src, Store, Connect>(
    source: &Src,
    connect: Connect,
) -> Result<IssPosition, RecordPositionError>
where
    Src: PositionSource,
    Store: PositionStore,
    Connect: FnOnce() -> Result<Store, EstablishConnectionError>,
{
    let mut store = connect().map_err(|source| RecordPositionError::Connect { source })?;

    store
        .ensure_table()
        .map_err(|source| RecordPositionError::EnsureTable { source })?;
    debug!("iss_position table ready");

    let IssNowResult { body, status } = source
        .fetch_current()
        .await
        .map_err(|source| RecordPositionError::Fetch { source })?;

    if !status.is_success() {
        return Err(RecordPositionError::UpstreamStatus { status });
    }
    debug!(%status, bytes = body.len(), "fetched ISS position");

    let sample = parse_iss_now(&body)?;

    store
        .insert_sample(&sample)
        .map_err(|source| RecordPositionError::InsertSample { source })
}

/// `record_position` mapped onto the trigger contract.
pub async fn invoke<Src, Store, Connect>(source: &Src, connect: Connect) -> InvocationResponse
where
    Src: PositionSource,
    Store: PositionStore,
    Connect: FnOnce() -> Result<Store, EstablishConnectionError>,
{
    match record_position(source, connect).await {
        Ok(row) => {
            info!(
                id = row.id,
                timestamp = ?row.timestamp,
                captured_at = ?row.captured_at(),
                latitude = ?row.latitude,
                longitude = ?row.longitude,
                "ISS position recorded"
            );
            InvocationResponse::success()
        }
        Err(err) => {
            error!(stage = %err.stage(), error = %err, "An error occurred");
            InvocationResponse::failure()
        }
    }
}
