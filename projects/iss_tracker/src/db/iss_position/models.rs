use chrono::{DateTime, Utc};
use diesel::prelude::*;
use crate::db::schema::iss_position;

// The table has no NOT NULL constraints, so rows written elsewhere may carry nulls.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable)]
#[diesel(table_name = iss_position)]
pub struct IssPosition {
    pub id: i32,
    pub timestamp: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl IssPosition {
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(i64::from(secs), 0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Insertable)]
#[diesel(table_name = iss_position)]
pub struct NewIssPosition {
    pub timestamp: i32,
    pub latitude: f64,
    pub longitude: f64,
}
