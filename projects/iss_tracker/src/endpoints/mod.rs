pub mod health;
pub mod iss;

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Extension, Router,
};
use interfaces_open_notify_iss_now::index::OpenNotifyClient;

use crate::config::TrackerConfig;

/// Shared by every request; each request still opens its own connection.
pub struct AppState {
	pub config: TrackerConfig,
	pub source: OpenNotifyClient,
}

pub fn router(state: Arc<AppState>) -> Router {
	Router::new()
		.route("/health", get(health::index::handler))
		.route("/iss/position/record", post(iss::position::record::index::handler))
		.layer(Extension(state))
}
