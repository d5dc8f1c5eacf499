//! # API Error Types
//!
//! Everything that can go wrong between the console and the backend.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend answer      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Rejected (400/422)     │ │
//! │  │  ConfigLoad     │  │  (no response)  │  │  Status (other non-2xx) │ │
//! │  │                 │  │                 │  │  Decode (bad JSON)      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  None of these are retried. The screen shows a toast and keeps its     │
//! │  current list.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a backend call or of loading the configuration.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never got a response (connection refused, timeout...).
    #[error("HTTP error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The backend refused the payload (400 or 422).
    #[error("{endpoint} rejected the request: {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidConfig(format!("base_url: {err}"))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::ConfigLoad(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ApiError {
    /// HTTP status of the backend answer, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for a 404 from the backend.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(self, ApiError::InvalidConfig(_) | ApiError::ConfigLoad(_))
    }

    /// Builds the error for a non-2xx answer.
    ///
    /// 400 and 422 are validation refusals; the message is taken from an
    /// `error` or `message` field when the body is JSON.
    pub(crate) fn from_status(endpoint: String, status: u16, body: String) -> Self {
        if status == 400 || status == 422 {
            let message = rejection_message(&body).unwrap_or(body);
            ApiError::Rejected {
                endpoint,
                status,
                message,
            }
        } else {
            ApiError::Status {
                endpoint,
                status,
                body,
            }
        }
    }
}

fn rejection_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message", "mensaje"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_uses_json_message() {
        let err = ApiError::from_status(
            "POST /clientes".into(),
            422,
            r#"{"error":"telefono duplicado"}"#.into(),
        );
        assert!(matches!(
            &err,
            ApiError::Rejected { message, status: 422, .. } if message == "telefono duplicado"
        ));
        assert_eq!(
            err.to_string(),
            "POST /clientes rejected the request: telefono duplicado"
        );
    }

    #[test]
    fn test_rejection_falls_back_to_body() {
        let err = ApiError::from_status("POST /ventas".into(), 400, "bad".into());
        assert!(matches!(err, ApiError::Rejected { message, .. } if message == "bad"));
    }

    #[test]
    fn test_other_statuses() {
        let err = ApiError::from_status("DELETE /clientes/99".into(), 404, "Not Found".into());
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_errors() {
        let err: ApiError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.is_config_error());
        assert_eq!(err.status(), None);
    }
}
