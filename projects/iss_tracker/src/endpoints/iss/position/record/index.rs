use std::sync::Arc;

use axum::{
	extract::{Extension, Json},
	http::StatusCode,
	response::IntoResponse,
};

use crate::{
	db::establish_connection,
	endpoints::AppState,
	recorder::{invoke, InvocationResponse},
};

/// Axum handler: POST /iss/position/record
///
/// The request body is ignored. Replies with the invocation's status code and
/// its `{statusCode, body}` document.
pub async fn handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
	let response = invoke(&state.source, || establish_connection(&state.config.database)).await;

	(status_of(&response), Json(response))
}

fn status_of(response: &InvocationResponse) -> StatusCode {
	StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
