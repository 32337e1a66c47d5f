use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use shop_service::{Error, SemanticSearchRequest, SemanticSearchResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/semantic", post(semantic_search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn semantic_search(
	State(state): State<AppState>,
	payload: Result<Json<SemanticSearchRequest>, JsonRejection>,
) -> Result<Json<SemanticSearchResponse>, ApiError> {
	let Json(payload) = payload.map_err(|rejection| {
		ApiError::new(StatusCode::BAD_REQUEST, "invalid_input", rejection.body_text())
	})?;
	let response = state.service.semantic_product_search(payload).await?;

	Ok(Json(response))
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidInput { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_input", message),
			Error::Precondition { .. } =>
				Self::new(StatusCode::PRECONDITION_FAILED, "precondition_failed", message),
			Error::Upstream { .. } => {
				tracing::error!(error = %message, "Semantic search failed upstream.");

				Self::new(StatusCode::BAD_GATEWAY, "upstream_error", message)
			},
			Error::Storage { .. } => {
				tracing::error!(error = %message, "Semantic search failed in storage.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

#[derive(Serialize)]
struct ErrorBody {
	error_code: &'static str,
	message: String,
}
