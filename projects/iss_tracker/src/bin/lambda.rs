use interfaces_open_notify_iss_now::index::OpenNotifyClient;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use projects_iss_tracker::{
	config::TrackerConfig,
	db::establish_connection,
	recorder::{invoke, InvocationResponse},
};
use serde_json::Value;
use tracing::info;
use utils_trace::{tracing_init, TraceFormat};

// The event payload is unused; the schedule only has to fire.
async fn handler(
	_event: LambdaEvent<Value>,
	config: &TrackerConfig,
	source: &OpenNotifyClient,
) -> Result<InvocationResponse, Error> {
	Ok(invoke(source, || establish_connection(&config.database)).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let config = TrackerConfig::from_env()?;

	// CloudWatch reads JSON lines unless ISS_LOG_FORMAT asks otherwise.
	let format = match std::env::var("ISS_LOG_FORMAT") {
		Ok(_) => config.log_format,
		Err(_) => TraceFormat::Json,
	};
	tracing_init("info", format)?;

	let source = OpenNotifyClient::new(config.upstream.url.clone(), config.upstream.timeout)?;
	info!(upstream = %source.url(), "ISS position source configured");

	let config = &config;
	let source = &source;
	lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
		handler(event, config, source).await
	}))
	.await
}
