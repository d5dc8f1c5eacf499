//! # deli-api: REST Layer for the Deli Admin Console
//!
//! The only crate that talks to the backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          deli-api Layout                                │
//! │                                                                         │
//! │   ConsoleConfig ──► ApiClient ──┬──► Repository<Customer>  /clientes    │
//! │   (TOML + env)      (reqwest)   ├──► Repository<Product>   /productos   │
//! │                         │       ├──► Repository<Inventory> /inventario  │
//! │                         │       ├──► Repository<Sale>      /ventas      │
//! │                         │       └──► report()              /reportes    │
//! │                         ▼                                               │
//! │                    QueryCache (shared, one entry per resource)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Console configuration
//! - [`client`] - HTTP client and status handling
//! - [`repository`] - Generic per-resource repository
//! - [`cache`] - Shared query cache
//! - [`report`] - The aggregated report
//! - [`error`] - API error types

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod repository;

pub use cache::QueryCache;
pub use client::ApiClient;
pub use config::ConsoleConfig;
pub use error::{ApiError, ApiResult};
pub use report::ReportSummary;
pub use repository::{MutationAck, Repository};
