use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] analytics::ValidationError),
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("{0}")]
    InvalidJson(#[from] JsonRejection),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidJson(rejection) => rejection.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "ok": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}
