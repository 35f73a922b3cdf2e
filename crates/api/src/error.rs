//! HTTP error mapping.
//!
//! Every handler returns [`AppResult`]; this module turns the failure side
//! into the JSON envelope `{"error": <message>, "code": <CODE>}`. Messages
//! on 500-class responses are sanitized and the underlying cause goes to
//! the log instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use wardrobe_core::error::CoreError;
use wardrobe_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain error from `wardrobe_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Object storage failed or timed out.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, and client-facing message of one error
/// response.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Rendered {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// The sanitized 500. Callers log the real cause before using this.
    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = match &self {
            AppError::Core(err) => render_core(err),
            AppError::Database(err) => render_sqlx(err),
            AppError::Storage(err) => render_storage(err),
            AppError::BadRequest(msg) => {
                Rendered::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Rendered::internal()
            }
        };

        let body = json!({
            "error": rendered.message,
            "code": rendered.code,
        });

        (rendered.status, axum::Json(body)).into_response()
    }
}

fn render_core(err: &CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => Rendered::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Rendered::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::Conflict(msg) => Rendered::new(StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Rendered::internal()
        }
    }
}

/// `RowNotFound` is a 404; a violated `uq_*` unique constraint is a 409.
/// Anything else logs and becomes the sanitized 500.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    match err {
        sqlx::Error::RowNotFound => {
            Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            // 23505 is Postgres for unique_violation.
            if db_err.code().as_deref() == Some("23505") {
                if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                    return Rendered::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            Rendered::internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Rendered::internal()
        }
    }
}

/// A timed-out upload surfaces as 504 so clients can tell a slow store
/// from a rejected request; backend failures are sanitized 500s.
fn render_storage(err: &StorageError) -> Rendered {
    match err {
        StorageError::Timeout(secs) => Rendered::new(
            StatusCode::GATEWAY_TIMEOUT,
            "STORAGE_TIMEOUT",
            format!("Storage upload timed out after {secs}s"),
        ),
        StorageError::Backend(msg) => {
            tracing::error!(error = %msg, "Storage backend error");
            Rendered::internal()
        }
    }
}
