//! ISS position recorder
//!
//! - Record flow (fetch, parse, store) in `recorder/`
//! - PostgreSQL models and queries in `db/`
//! - HTTP trigger endpoints in `endpoints/`, Lambda entry point in `bin/lambda.rs`
//! - Reads DATABASE_URL (or PGHOST/PGUSER/PGPASSWORD) from the environment

pub mod config;
pub mod db;
pub mod endpoints;
pub mod recorder;
