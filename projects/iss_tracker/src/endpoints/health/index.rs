use axum::{http::StatusCode, response::IntoResponse};

/// Axum handler: GET /health
pub async fn handler() -> impl IntoResponse {
	(StatusCode::OK, "ok")
}
