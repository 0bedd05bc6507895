use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Failure categories exposed by the account service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Caller supplied malformed or conflicting input.
    #[error("{0}")]
    Validation(String),

    /// The targeted identifier does not exist in the store.
    #[error("{0}")]
    NotFound(String),

    /// The store failed for a reason not attributable to caller input.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything not classified above.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation error",
            ApiError::NotFound(_) => "Not found",
            ApiError::Database(_) => "Database error",
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

/// True when the driver reports a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

fn expose_errors() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v == "development")
        .unwrap_or(false)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                if expose_errors() {
                    e.to_string()
                } else {
                    "An error occurred while processing the request".to_string()
                }
            }
            ApiError::Internal(e) => {
                error!(error = %e, "unhandled error");
                if expose_errors() {
                    e.to_string()
                } else {
                    "An unexpected error occurred".to_string()
                }
            }
        };

        let body = Json(json!({
            "error": self.label(),
            "message": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
