use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use roster_service::{Error, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/query", post(query))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn query(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				Some(vec!["$.query".to_string()]),
			),
			// Unreachable from `search`, which degrades collaborator failures to fewer results.
			other => ApiError::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				"internal_error",
				other.to_string(),
				None,
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_query_maps_to_bad_request() {
		let err = ApiError::from(Error::InvalidRequest { message: "query must be non-empty.".into() });

		assert_eq!(err.status, StatusCode::BAD_REQUEST);
		assert_eq!(err.error_code, "invalid_request");
		assert_eq!(err.fields, Some(vec!["$.query".to_string()]));
	}

	#[test]
	fn collaborator_errors_map_to_internal_error() {
		let err = ApiError::from(Error::Timeout { operation: "vector match", timeout_ms: 50 });

		assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(err.error_code, "internal_error");
		assert_eq!(err.fields, None);
	}
}
