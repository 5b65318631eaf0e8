use crate::domain::CoreError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error type returned by every handler.
///
/// Wraps [`CoreError`] and renders `{ "message": ... }` with the matching
/// status code. Store failures also carry the underlying error text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body or query string could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // ---
        let (status, body) = match self {
            AppError::Core(core) => match core {
                CoreError::NotFound(entity) => (
                    StatusCode::NOT_FOUND,
                    json!({ "message": format!("{entity} not found") }),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "message": msg })),
                CoreError::Store(err) => {
                    tracing::error!(error = ?err, "store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "message": "Server error", "error": format!("{err:#}") }),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
        };

        (status, axum::Json(body)).into_response()
    }
}
