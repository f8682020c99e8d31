//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::{MoneyError, PortError, TemporalError};
use domain_funds::{FundsError, FxError};
use domain_ihs::IhsError;
use domain_report::ReportError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigLoadError;

/// Errors wiring the application at startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error("Invalid API_TIMEZONE: {0}")]
    Timezone(#[from] TemporalError),

    #[error("Failed to create FX provider: {0}")]
    FxProvider(#[from] PortError),
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg.clone())
            }
            ApiError::Internal(msg) => {
                error!(message = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<FundsError> for ApiError {
    fn from(err: FundsError) -> Self {
        match err {
            FundsError::UnknownRoute(_) => ApiError::BadRequest(err.to_string()),
            FundsError::MissingCourseDates
            | FundsError::InvalidCoursePeriod { .. }
            | FundsError::Money(_) => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<IhsError> for ApiError {
    fn from(err: IhsError) -> Self {
        match err {
            IhsError::UnknownServiceTier(_) => ApiError::BadRequest(err.to_string()),
            IhsError::Temporal(_) => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Funds(e) => e.into(),
            ReportError::Ihs(e) => e.into(),
            ReportError::InvalidConfig(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<MoneyError> for ApiError {
    fn from(err: MoneyError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<FxError> for ApiError {
    fn from(err: FxError) -> Self {
        ApiError::ServiceUnavailable(err.to_string())
    }
}
