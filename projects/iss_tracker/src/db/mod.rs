pub mod schema;
pub mod iss_position;

use diesel::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum EstablishConnectionError {
    #[error("Connect: {source}")]
    Connect {
        #[from]
        source: diesel::ConnectionError,
    },

    #[error("SetStatementTimeout: {source}")]
    SetStatementTimeout {
        #[from]
        source: diesel::result::Error,
    },
}

/// Opens one connection for one invocation. It is closed when dropped.
pub fn establish_connection(config: &DatabaseConfig) -> Result<PgConnection, EstablishConnectionError> {
    let mut conn = PgConnection::establish(&config.connection_string())
        .map_err(|source| EstablishConnectionError::Connect { source })?;

    let timeout_ms = config.statement_timeout.as_millis();
    diesel::sql_query(format!("SET statement_timeout = {timeout_ms}"))
        .execute(&mut conn)
        .map_err(|source| EstablishConnectionError::SetStatementTimeout { source })?;

    debug!(statement_timeout_ms = %timeout_ms, "database connection established");

    Ok(conn)
}
