//! # Error Types
//!
//! Domain-specific error types for deli-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  deli-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form validation failures (never sent)          │
//! │                                                                         │
//! │  deli-api errors (separate crate)                                      │
//! │  └── ApiError         - REST call failures                             │
//! │                                                                         │
//! │  console errors (in app)                                               │
//! │  └── ConsoleError     - What the operator sees (as a Notification)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConsoleError → Notification       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::RecordId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The forecast cannot be computed from the given series.
    ///
    /// ## When This Occurs
    /// - Fewer than two monthly points
    /// - All points share one position (zero OLS denominator)
    /// - The last observed value is zero, so a percent change is undefined
    #[error("Not enough data to forecast: {reason}")]
    InsufficientData { reason: String },

    /// A line index passed to `remove_line` does not exist.
    #[error("Line {index} does not exist (sale has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Form validation errors.
///
/// Raised on the client before any request is made. The console shows these
/// as a blocking alert rather than a toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    MissingRequiredField { field: String },

    /// Name contains something other than letters and spaces.
    #[error("Name may only contain letters and spaces")]
    InvalidName,

    /// Email is present but not shaped like `local@domain.tld`.
    #[error("Email must look like name@domain.tld")]
    InvalidEmail,

    /// Phone is not 6 to 15 digits.
    #[error("Phone must be 6 to 15 digits")]
    InvalidPhone,

    /// No product was selected.
    #[error("A product must be selected")]
    MissingProduct,

    /// The selected product is not among the loaded products.
    #[error("Product {0} is not in the product list")]
    UnknownProduct(RecordId),

    /// No customer was selected for the sale.
    #[error("A customer must be selected")]
    MissingCustomer,

    /// The sale has no line items.
    #[error("The sale needs at least one line item")]
    NoLineItems,

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

impl ValidationError {
    pub(crate) fn missing(field: &str) -> Self {
        ValidationError::MissingRequiredField {
            field: field.to_string(),
        }
    }

    pub(crate) fn negative(field: &str) -> Self {
        ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        }
    }

    /// A sale total that does not fit in `i64` cents.
    pub(crate) fn total_overflow() -> Self {
        ValidationError::negative("total")
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result of a validation check.
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
