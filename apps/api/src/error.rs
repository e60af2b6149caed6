//! # API Error Types
//!
//! What HTTP clients see. Every lower-layer error funnels into [`ApiError`],
//! which carries the status code and a user-facing message.
//!
//! ## Status Code Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError                          → 400 Bad Request             │
//! │  *NotFound (core) / DbError::NotFound     → 404 Not Found               │
//! │  DuplicateCompanyName / UniqueViolation   → 409 Conflict                │
//! │  ScheduleComplete / CashSaleHasNoSchedule                               │
//! │                    / ScheduleMissing      → 422 Unprocessable Entity    │
//! │  everything else                          → 500 Internal Server Error   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Side-effect failures after a successful primary write never become an
//! ApiError - they travel as warnings inside the 2xx response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use lotledger_core::error::{CoreError, ValidationError};
use lotledger_db::DbError;

/// API-level error with an HTTP status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or rule-violating input.
    #[error("{0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Write conflicts with an existing record (duplicate business key).
    #[error("{0}")]
    Conflict(String),

    /// Input is well-formed but the operation violates a business rule.
    #[error("{0}")]
    UnprocessableEntity(String),

    /// Unexpected failure. Details are logged, not exposed.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs.
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(%detail, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::VehicleNotFound(_)
            | CoreError::SaleNotFound(_)
            | CoreError::FloorPlanNotFound(_)
            | CoreError::CustomerNotFound(_) => ApiError::NotFound(err.to_string()),

            CoreError::ScheduleComplete { .. }
            | CoreError::CashSaleHasNoSchedule { .. }
            | CoreError::ScheduleMissing { .. } => ApiError::UnprocessableEntity(err.to_string()),

            CoreError::DuplicateCompanyName(_) => ApiError::Conflict(err.to_string()),

            CoreError::Validation(inner) => inner.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_status_mapping() {
        let err: ApiError = CoreError::SaleNotFound("RC-2026-0001".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::ScheduleComplete {
            receipt_number: "RC-2026-0001".into(),
            paid: 12,
            total: 12,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::ScheduleMissing {
            receipt_number: "RC-2026-0001".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::DuplicateCompanyName("Heartland".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_db_error_status_mapping() {
        let err: ApiError = DbError::not_found("Vehicle", "v1").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::duplicate("receipt_id", "RC-2026-0001").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = DbError::Internal("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
