use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use cohort_core::error::{CoreError, TransitionError};
use cohort_core::interview::InterviewSlotError;
use cohort_core::letters::RenderError;
use cohort_core::registration::RegistrationError;
use cohort_core::types::DbId;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cohort_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A rejected registration, reported with a field-specific code.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The document renderer failed; nothing was persisted.
    #[error("Downstream failure: {0}")]
    Downstream(String),

    /// The state change committed but its email could not be delivered.
    ///
    /// The outbox entry stays queued and can be retried.
    #[error("Notification pending for outbox entry {entry_id}: {message}")]
    NotificationPending { entry_id: DbId, message: String },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Downstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundByKey { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Registration(err) => {
                (StatusCode::BAD_REQUEST, registration_code(err), err.to_string())
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Downstream(msg) => {
                tracing::error!(error = %msg, "Downstream failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "DOWNSTREAM_FAILURE",
                    "Document generation failed; no changes were made".to_string(),
                )
            }
            AppError::NotificationPending { entry_id, message } => {
                tracing::warn!(entry_id, error = %message, "Notification delivery failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "NOTIFICATION_PENDING",
                    format!(
                        "The change was saved but the email could not be sent \
                         (outbox entry {entry_id}); retry delivery from the outbox"
                    ),
                )
            }
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

/// Error code reported for each registration rejection.
fn registration_code(err: &RegistrationError) -> &'static str {
    match err {
        RegistrationError::MissingField(_) => "MISSING_FIELD",
        RegistrationError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
        RegistrationError::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
        RegistrationError::Interview(slot) => match slot {
            InterviewSlotError::DisallowedInterviewDay(_) => "DISALLOWED_INTERVIEW_DAY",
            InterviewSlotError::DisallowedInterviewHoliday(_) => "DISALLOWED_INTERVIEW_HOLIDAY",
            InterviewSlotError::DisallowedInterviewHour(_) => "DISALLOWED_INTERVIEW_HOUR",
        },
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations (a row still referenced elsewhere) map to 409.
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
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            // PostgreSQL foreign key violation: error code 23503
            if db_err.code().as_deref() == Some("23503") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "The record is still referenced by other records".to_string(),
                );
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
