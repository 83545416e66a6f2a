//! # App Error Type
//!
//! Unified error type at the screen boundary.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Library error                          AppError.code                   │
//! │  ─────────────                          ─────────────                   │
//! │  register_api::ApiError     ─────────►  PURCHASE_FAILED                 │
//! │  camera::CameraError        ─────────►  CAMERA_UNAVAILABLE              │
//! │  register_core::CoreError   ─────────►  CART_ERROR / VALIDATION_ERROR   │
//! │  state::ConfigError         ─────────►  CONFIG_ERROR                    │
//! │  std::io / serde_json       ─────────►  INTERNAL / VALIDATION_ERROR     │
//! │                                                                         │
//! │  A rendering layer receives { "code": "...", "message": "..." } and     │
//! │  picks the localized text for the code; `message` is for logs.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use register_api::ApiError;
use register_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::camera::CameraError;
use crate::state::ConfigError;

/// Error returned to the rendering layer.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PURCHASE_FAILED",
///   "message": "Purchase rejected with HTTP 500"
/// }
/// ```
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for logs
    pub message: String,
}

/// Error codes for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Configuration is missing or invalid
    ConfigError,

    /// Cart operation failed
    CartError,

    /// The purchase endpoint failed or refused the purchase
    PurchaseFailed,

    /// The scanner could not start the camera
    CameraUnavailable,

    /// Anything else
    Internal,
}

/// Result type alias at the screen boundary.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts purchase errors to app errors.
impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingEndpoint | ApiError::InvalidEndpoint(_) => {
                AppError::new(ErrorCode::ConfigError, err.to_string())
            }
            _ => AppError::new(ErrorCode::PurchaseFailed, err.to_string()),
        }
    }
}

/// Converts camera errors to app errors.
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::new(ErrorCode::CameraUnavailable, err.to_string())
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => AppError::from(e),
            other => AppError::new(ErrorCode::CartError, other.to_string()),
        }
    }
}

/// Converts validation errors to app errors.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts configuration errors to app errors.
impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O failure: {}", err);
        AppError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::validation(format!("Malformed cart JSON: {}", err))
    }
}
