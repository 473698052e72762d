use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::repositories::StoreError;
use crate::services::WorkflowError;
use crate::types::LeaveRequestId;

/// Failures raised by the filtering and bulk-approval core.
///
/// Everything except `StoreUpdateFailure` is a precondition failure and is
/// reported before the request store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("malformed time label {0:?}, expected HH:MM AM|PM")]
    MalformedTimeLabel(String),

    #[error("malformed date {0:?}, expected YYYY-MM-DD")]
    MalformedDate(String),

    #[error("incomplete window, missing: {}", .missing.join(", "))]
    IncompleteWindow { missing: Vec<&'static str> },

    #[error("from date {from} is after to date {to}")]
    InvertedWindow { from: NaiveDate, to: NaiveDate },

    #[error("no requests selected")]
    EmptySelection,

    #[error("failed to update request {id}: {reason}")]
    StoreUpdateFailure { id: LeaveRequestId, reason: String },
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::MalformedTimeLabel(_) => "MALFORMED_TIME_LABEL",
            CoreError::MalformedDate(_) => "MALFORMED_DATE",
            CoreError::IncompleteWindow { .. } => "INCOMPLETE_WINDOW",
            CoreError::InvertedWindow { .. } => "INVERTED_WINDOW",
            CoreError::EmptySelection => "EMPTY_SELECTION",
            CoreError::StoreUpdateFailure { .. } => "STORE_UPDATE_FAILURE",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Precondition(CoreError),
    BadGateway(String),
    GatewayTimeout(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND".to_string(), None),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg,
                "BAD_REQUEST".to_string(),
                None,
            ),
            AppError::Precondition(err) => {
                let details = match &err {
                    CoreError::IncompleteWindow { missing } => {
                        Some(serde_json::json!({ "missing": missing }))
                    }
                    _ => None,
                };
                (
                    StatusCode::BAD_REQUEST,
                    err.to_string(),
                    err.code().to_string(),
                    details,
                )
            }
            AppError::BadGateway(msg) => {
                tracing::warn!(error = %msg, "request store unavailable");
                (StatusCode::BAD_GATEWAY, msg, "STORE_UNAVAILABLE".to_string(), None)
            }
            AppError::GatewayTimeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                msg,
                "STORE_TIMEOUT".to_string(),
                None,
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StoreUpdateFailure { .. } => AppError::BadGateway(err.to_string()),
            other => AppError::Precondition(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Unsupported(_) => AppError::BadRequest(err.to_string()),
            StoreError::Timeout(_) => AppError::GatewayTimeout(err.to_string()),
            StoreError::Unavailable(_) | StoreError::InvalidResponse(_) => {
                AppError::BadGateway(err.to_string())
            }
            StoreError::Database(_) => AppError::InternalServerError(anyhow::Error::new(err)),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Core(err) => err.into(),
            WorkflowError::Store(err) => err.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}
