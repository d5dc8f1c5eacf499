//! # deli-core: Pure Business Logic for the Deli Admin Console
//!
//! Everything the console decides without talking to the backend: which
//! forms are valid, what a sale totals, and where monthly sales are heading.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Deli Admin Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console                                 │   │
//! │  │    Customers ── Products ── Inventory ── Sales ── Dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ deli-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  entity   │  │   sale    │  │ forecast  │  │   │
//! │  │   │  records  │  │  Entity   │  │ SaleDraft │  │   OLS     │  │   │
//! │  │   │  drafts   │  │  search   │  │  totals   │  │  overlay  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    deli-api (REST layer)                        │   │
//! │  │          repositories, query cache, report endpoint            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records, drafts and payloads for each resource
//! - [`money`] - Money type with integer arithmetic
//! - [`entity`] - The `Entity` trait and search filtering
//! - [`validation`] - Form validation rules
//! - [`coerce`] - Lenient numeric parsing of form text
//! - [`sale`] - The sale draft (header + lines + total)
//! - [`forecast`] - Least-squares sales projection
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use deli_core::money::Money;
//! use deli_core::sale::SaleDraft;
//!
//! let mut draft = SaleDraft::new();
//! draft.add_line(Some(1), 2, Money::from_cents(1000)).unwrap();
//! draft.add_line(Some(2), 1, Money::from_cents(500)).unwrap();
//! draft.select_customer(Some(3));
//!
//! let payload = draft.submit().unwrap();
//! assert_eq!(payload.total, Money::from_cents(2500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coerce;
pub mod entity;
pub mod error;
pub mod forecast;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use entity::{filter_records, EditPolicy, Entity};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use forecast::{forecast, Forecast, MonthlyPoint, Trend};
pub use money::Money;
pub use sale::{DraftState, SaleDraft};
pub use types::*;

// =============================================================================
// Business Constants
// =============================================================================

/// Shortest accepted phone number, in digits.
pub const MIN_PHONE_DIGITS: usize = 6;

/// Longest accepted phone number, in digits.
pub const MAX_PHONE_DIGITS: usize = 15;

/// Currency symbol used when displaying money (Peruvian sol).
pub const CURRENCY_SYMBOL: &str = "S/";
