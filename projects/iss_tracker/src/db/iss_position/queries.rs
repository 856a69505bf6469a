use diesel::prelude::*;
use thiserror::Error;
use crate::db::{iss_position::models::*, schema::iss_position::dsl::*};

pub const CREATE_ISS_POSITION_TABLE: &str = "CREATE TABLE IF NOT EXISTS iss_position (
    id SERIAL PRIMARY KEY,
    timestamp INTEGER,
    latitude FLOAT,
    longitude FLOAT
)";

#[derive(Debug, Error)]
pub enum EnsureIssPositionTableError {
    #[error("EnsureIssPositionTable: {source}")]
    EnsureIssPositionTable {
        #[from]
        source: diesel::result::Error,
    },
}

// Arbitrary key shared by every session that creates the table.
const ISS_POSITION_DDL_LOCK: i64 = 0x155_0001;

/// Concurrent `CREATE TABLE IF NOT EXISTS` on a fresh database can still hit
/// `pg_type` unique violations, so creators take a transaction-scoped
/// advisory lock first and run one at a time.
pub fn ensure_iss_position_table(conn: &mut PgConnection) -> Result<(), EnsureIssPositionTableError> {
    conn.transaction(|conn| {
        diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
            .bind::<diesel::sql_types::BigInt, _>(ISS_POSITION_DDL_LOCK)
            .execute(conn)?;

        diesel::sql_query(CREATE_ISS_POSITION_TABLE).execute(conn)
    })
    .map(|_| ())
    .map_err(|source| EnsureIssPositionTableError::EnsureIssPositionTable { source })
}

#[derive(Debug, Error)]
pub enum InsertIssPositionError {
    #[error("InsertIssPosition: {source}")]
    InsertIssPosition {
        #[from]
        source: diesel::result::Error,
    },
}

/// Inserts one sample in its own transaction; nothing is kept if the insert fails.
pub fn insert_iss_position(
    conn: &mut PgConnection,
    new: &NewIssPosition,
) -> Result<IssPosition, InsertIssPositionError> {
    conn.transaction(|conn| {
        diesel::insert_into(iss_position)
            .values(new)
            .get_result::<IssPosition>(conn)
    })
    .map_err(|source| InsertIssPositionError::InsertIssPosition { source })
}

#[derive(Debug, Error)]
pub enum CountIssPositionsError {
    #[error("CountIssPositions: {source}")]
    CountIssPositions {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_iss_positions(conn: &mut PgConnection) -> Result<i64, CountIssPositionsError> {
    iss_position
        .count()
        .get_result(conn)
        .map_err(|source| CountIssPositionsError::CountIssPositions { source })
}

#[derive(Debug, Error)]
pub enum GetLatestIssPositionError {
    #[error("GetLatestIssPosition: {source}")]
    GetLatestIssPosition {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_latest_iss_position(
    conn: &mut PgConnection,
) -> Result<Option<IssPosition>, GetLatestIssPositionError> {
    iss_position
        .order(id.desc())
        .first::<IssPosition>(conn)
        .optional()
        .map_err(|source| GetLatestIssPositionError::GetLatestIssPosition { source })
}
