use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Exhausted retries against the metadata provider.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Explicit throttling signal from the provider (HTTP 429).
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Dedup race on (external_id, media_type). Not a failure outcome.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Job was not in a claimable state.
    #[error("Already claimed: {0}")]
    AlreadyClaimed(String),

    /// Cancellation could not be applied: the job is missing or already
    /// terminal (only Processing jobs are cancellable).
    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                AppError::NotFound("Record not found in database".to_string())
            }
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => AppError::DuplicateKey(info.message().to_string()),
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::DatabaseError(format!("Database pool error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::ProviderUnavailable("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::ProviderUnavailable("Failed to connect to provider".to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                429 => AppError::RateLimited("Too many requests".to_string()),
                404 => AppError::NotFound("Provider resource not found".to_string()),
                _ => AppError::ProviderUnavailable(format!("HTTP {}: {}", status, err)),
            }
        } else {
            AppError::ProviderUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::ValidationError(format!("Invalid UUID: {}", err))
    }
}

impl AppError {
    /// Whether the error is scoped to a single item rather than the whole
    /// batch. Per-item errors are recorded in the job's error log and the
    /// batch continues; anything else aborts the job.
    pub fn is_item_scoped(&self) -> bool {
        matches!(
            self,
            AppError::ProviderUnavailable(_)
                | AppError::RateLimited(_)
                | AppError::NotFound(_)
                | AppError::DuplicateKey(_)
        )
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
