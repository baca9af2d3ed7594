/// Maps the error taxonomy onto HTTP responses
use crate::shared::errors::AppError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            // A non-cancellable job reads the same as a missing one, so
            // terminal jobs cannot be told apart from unknown ones.
            AppError::NotFound(_) | AppError::Cancelled(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            // Overlap guard and dedup races both read as "already there".
            AppError::AlreadyClaimed(_) | AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::ProviderUnavailable(_) | AppError::RateLimited(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::DatabaseError(_)
            | AppError::SerializationError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}
