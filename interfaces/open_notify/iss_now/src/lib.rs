//! Client for the Open Notify "where is the ISS now" endpoint.
//!
//! `index` performs the HTTP call and hands back the raw body, `models`
//! holds the shapes the body is parsed into.

pub mod index;
pub mod models;
