use diesel::PgConnection;

use crate::db::iss_position::{
    models::{IssPosition, NewIssPosition},
    queries::{
        ensure_iss_position_table, insert_iss_position, EnsureIssPositionTableError,
        InsertIssPositionError,
    },
};

/// Storage side of one invocation. Implementors own their connection and
/// release it on drop.
pub trait PositionStore {
    fn ensure_table(&mut self) -> Result<(), EnsureIssPositionTableError>;

    fn insert_sample(&mut self, new: &NewIssPosition) -> Result<IssPosition, InsertIssPositionError>;
}

impl PositionStore for PgConnection {
    fn ensure_table(&mut self) -> Result<(), EnsureIssPositionTableError> {
        ensure_iss_position_table(self)
    }

    fn insert_sample(&mut self, new: &NewIssPosition) -> Result<IssPosition, InsertIssPositionError> {
        insert_iss_position(self, new)
    }
}
