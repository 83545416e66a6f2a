//! # API Error Types
//!
//! Everything that can make a purchase submission fail.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Failure Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  MissingEndpoint│  │  Connection     │  │  Rejected (non-2xx)     │ │
//! │  │  InvalidEndpoint│  │  Timeout        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  The confirmation screen treats every variant the same way: show the    │
//! │  failure notice, roll back, let the cashier press OK again.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for purchase operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Purchase submission failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No API base URL was configured.
    #[error("Purchase endpoint is not configured")]
    MissingEndpoint,

    /// The configured API base URL is not a usable http(s) URL.
    #[error("Invalid API base URL: {0}")]
    InvalidEndpoint(String),

    /// The endpoint answered with a non-success status.
    #[error("Purchase rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// The request did not complete in time.
    #[error("Purchase request timed out")]
    Timeout,

    /// The request never produced a response.
    #[error("Purchase request failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// True when the endpoint was reached and answered.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = err.status() {
            ApiError::Rejected {
                status: status.as_u16(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidEndpoint(err.to_string())
    }
}
