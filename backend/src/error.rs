//! Error handling for the fish ledger
//!
//! Every operation failure is one of three kinds: bad input, a business
//! rule rejection, or a storage fault. All are turned into a structured
//! JSON response at the handler boundary.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::validation::ValidationError;
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Business rule errors
    #[error("Insufficient stock. Available: {available}")]
    InsufficientStock { available: Decimal },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientStock { available } => {
                AppError::InsufficientStock { available }
            }
            StoreError::BalanceOutOfRange => AppError::Validation {
                field: "quantity".to_string(),
                message: "quantity takes the balance out of range".to_string(),
            },
            StoreError::TotalOutOfRange => {
                AppError::Storage("report total out of range".to_string())
            }
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Corrupt(msg) => AppError::Storage(msg),
        }
    }
}

/// Split a `path: message` deserializer rendering, falling back to `default_field`
fn decode_failure(detail: &str, default_field: &str) -> AppError {
    let (field, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            (path, message)
        }
        _ => (default_field, detail),
    };
    AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let text = err.body_text();
                let detail = text
                    .strip_prefix("Failed to deserialize the JSON body into the target type: ")
                    .unwrap_or(&text);
                decode_failure(detail, "body")
            }
            other => AppError::Validation {
                field: "body".to_string(),
                message: other.body_text(),
            },
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let text = rejection.body_text();
        let detail = text
            .strip_prefix("Failed to deserialize query string: ")
            .unwrap_or(&text);
        decode_failure(detail, "query")
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub available: Option<Decimal>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation { field, message } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: message.clone(),
                field: Some(field.clone()),
                available: None,
            },
            AppError::InsufficientStock { available } => ErrorDetail {
                code: "INSUFFICIENT_STOCK".to_string(),
                message: self.to_string(),
                field: Some("quantity".to_string()),
                available: Some(*available),
            },
            // Storage details stay in the log
            AppError::Storage(_) | AppError::Database(_) => ErrorDetail {
                code: "STORAGE_ERROR".to_string(),
                message: "A storage error occurred".to_string(),
                field: None,
                available: None,
            },
            AppError::Internal(_) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred".to_string(),
                field: None,
                available: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
