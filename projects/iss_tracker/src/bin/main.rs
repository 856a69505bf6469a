use std::sync::Arc;

use axum::serve;
use interfaces_open_notify_iss_now::index::{FetchIssNowError, OpenNotifyClient};
use projects_iss_tracker::{
	config::{ConfigError, TrackerConfig},
	endpoints::{router, AppState},
};
use thiserror::Error;
use tracing::info;
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("LoadConfig: {source}")]
	LoadConfig {
		#[source]
		source: ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("BuildClient: {source}")]
	BuildClient {
		#[source]
		source: FetchIssNowError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	}
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	let config = TrackerConfig::from_env()
		.map_err(|source| MainError::LoadConfig { source })?;

	tracing_init("info", config.log_format)
		.map_err(|source| MainError::TracingInit { source })?;

	let source = OpenNotifyClient::new(config.upstream.url.clone(), config.upstream.timeout)
		.map_err(|source| MainError::BuildClient { source })?;

	info!(upstream = %source.url(), "ISS position source configured");

	let addr = config.bind_addr;
	let app = router(Arc::new(AppState { config, source }));

	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", addr);

	serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
