//! # Console Error Type
//!
//! Unified error type for screen actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Screen action (submit, delete, load)                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ─── ValidationError ───┐                             │
//! │         │                                 │                             │
//! │         ▼                                 ▼                             │
//! │  Backend Error? ────── ApiError ───────► ConsoleError { code, message } │
//! │         │                                 │                             │
//! │         ▼                                 ▼                             │
//! │  Success ───► Toast             Alert (validation) or Toast (others)    │
//! │                                                                         │
//! │  The screen's list is left as it was on any failure.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use deli_api::ApiError;
use deli_core::{CoreError, ValidationError};

use crate::notify::Notification;

/// Result type alias for screen actions.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// What an action failure looks like to the operator.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "DELETE /clientes/99 returned 404: Not Found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ConsoleError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for screen actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record or resource not found (404)
    NotFound,

    /// Form validation failed (client side, nothing was sent)
    ValidationError,

    /// Backend refused the payload (400/422)
    Rejected,

    /// No response from the backend
    Transport,

    /// Backend answered with another error status
    Backend,

    /// Backend answer could not be decoded
    Decode,

    /// Configuration is unusable
    Config,

    /// Forecast suppressed for lack of data
    InsufficientData,

    /// A submit is already in flight
    Busy,
}

impl ConsoleError {
    /// Creates a new console error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ConsoleError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ConsoleError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates the error for a submit while another is running.
    pub fn busy() -> Self {
        ConsoleError::new(ErrorCode::Busy, "A save is already in progress")
    }

    /// How the operator is told about this error.
    ///
    /// Validation problems block with an alert, everything else is a toast.
    pub fn notification(&self) -> Notification {
        match self.code {
            ErrorCode::ValidationError => Notification::alert(&self.message),
            ErrorCode::InsufficientData => Notification::info(&self.message),
            _ => Notification::error(&self.message),
        }
    }
}

/// Converts form validation errors to console errors.
impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::new(ErrorCode::ValidationError, err.to_string())
    }
}

/// Converts core errors to console errors.
impl From<CoreError> for ConsoleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => v.into(),
            CoreError::InsufficientData { .. } => {
                ConsoleError::new(ErrorCode::InsufficientData, err.to_string())
            }
            CoreError::LineNotFound { .. } => ConsoleError::new(ErrorCode::NotFound, err.to_string()),
        }
    }
}

/// Converts API errors to console errors.
impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Transport { endpoint, source } => {
                error!(%endpoint, error = %source, "Backend unreachable");
                ConsoleError::new(
                    ErrorCode::Transport,
                    format!("Could not reach the server ({endpoint})"),
                )
            }
            ApiError::Status { status: 404, .. } => {
                ConsoleError::new(ErrorCode::NotFound, err.to_string())
            }
            ApiError::Status { .. } => ConsoleError::new(ErrorCode::Backend, err.to_string()),
            ApiError::Rejected { message, .. } => {
                ConsoleError::new(ErrorCode::Rejected, message.clone())
            }
            ApiError::Decode { endpoint, source } => {
                error!(%endpoint, error = %source, "Unexpected response body");
                ConsoleError::new(
                    ErrorCode::Decode,
                    format!("Unexpected answer from {endpoint}"),
                )
            }
            ApiError::InvalidConfig(_) | ApiError::ConfigLoad(_) => {
                ConsoleError::new(ErrorCode::Config, err.to_string())
            }
        }
    }
}
