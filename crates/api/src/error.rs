use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelbase_cloud::AssetStoreError;
use reelbase_core::error::CoreError;
use serde_json::json;

use crate::mailer::MailError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
///
/// Status mapping follows the service contract: validation and conflicts are
/// 400, authorization failures are 401, missing documents are 404, and any
/// dependency (asset store, mailer, database) that did not report success is
/// a 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reelbase_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An asset-store operation that failed or did not report success.
    #[error("Asset store error: {0}")]
    Asset(#[from] AssetStoreError),

    /// An email that could not be handed to the SMTP relay.
    #[error("Mailer error: {0}")]
    Mail(#[from] MailError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource addressed by something other than an id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Multi-field validation failure; each entry is one message.
    #[error("Validation failed")]
    ValidationErrors(Vec<String>),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Multi-field validation carries an array of messages instead of a
        // single string, mirroring what form clients expect.
        if let AppError::ValidationErrors(messages) = &self {
            let body = json!({
                "error": messages,
                "code": "VALIDATION_ERROR",
            });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::BAD_REQUEST, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Dependency(msg) => {
                    tracing::error!(error = %msg, "Dependency failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DEPENDENCY_FAILURE",
                        msg.clone(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Dependency errors ---
            AppError::Asset(err) => {
                tracing::error!(error = %err, "Asset store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DEPENDENCY_FAILURE",
                    err.to_string(),
                )
            }
            AppError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DEPENDENCY_FAILURE",
                    "Could not deliver email".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::ValidationErrors(_) => unreachable!("handled above"),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 400 Conflict.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::BAD_REQUEST,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Turn a unique-constraint violation on `constraint` into a domain
/// conflict with a friendly message; pass every other error through.
pub fn conflict_on_unique(err: sqlx::Error, constraint: &str, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(constraint)
        {
            return AppError::Core(CoreError::Conflict(message.to_string()));
        }
    }
    AppError::Database(err)
}
