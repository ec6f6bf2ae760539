use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("Duplicate identity: {0}")]
    DuplicateIdentity(String),
    #[error("Scheduling conflict: {0}")]
    SchedulingConflict(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// True when the sqlx error is a unique constraint violation.
    pub fn is_unique_violation(e: &sqlx::Error) -> bool {
        if let sqlx::Error::Database(db_err) = e {
            let code = db_err.code().unwrap_or_default();
            // 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation
            return code == "2067" || code == "23505";
        }
        false
    }

    /// True when the transaction lost a race and the caller may retry.
    pub fn is_lock_contention(e: &sqlx::Error) -> bool {
        if let sqlx::Error::Database(db_err) = e {
            let code = db_err.code().unwrap_or_default();
            // 5/517 = SQLite busy/busy_snapshot, 40001/40P01 = Postgres serialization/deadlock
            return code == "5" || code == "517" || code == "40001" || code == "40P01";
        }
        false
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if AppError::is_unique_violation(e) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({ "error": "Resource already exists (duplicate entry)" })),
                    )
                        .into_response();
                }
                if AppError::is_lock_contention(e) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({ "error": "Transaction conflict, please retry" })),
                    )
                        .into_response();
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::CapacityExceeded(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::DuplicateIdentity(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::SchedulingConflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
