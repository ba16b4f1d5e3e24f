// HTTP-facing errors. Store failures become a retryable "data unavailable" response;
// the cause is logged, not sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::DATA_UNAVAILABLE;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("violation {0} not found")]
    NotFound(i64),
    #[error("data unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg, "retryable": false }),
            ),
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": self.to_string(), "retryable": false }),
            ),
            ApiError::Unavailable(e) => {
                tracing::warn!(error = %e, "store request failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    serde_json::json!({ "error": DATA_UNAVAILABLE, "retryable": true }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
