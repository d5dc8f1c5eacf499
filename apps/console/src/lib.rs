//! # Deli Console Library
//!
//! Screen controllers for the deli admin console, and the command-line
//! front end that drives them.
//!
//! ## Module Organization
//! ```text
//! deli_console/
//! ├── lib.rs          ◄─── You are here (Console context, tracing setup)
//! ├── cli.rs          ◄─── Command-line arguments and output
//! ├── error.rs        ◄─── ConsoleError: what a failed action looks like
//! ├── notify.rs       ◄─── Toasts and alerts
//! └── screens/
//!     ├── screen.rs   ◄─── Generic list/modal controller
//!     ├── inventory.rs
//!     ├── sales.rs
//!     └── dashboard.rs
//! ```
//!
//! ## Shared State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Console                                        │
//! │                                                                         │
//! │   ConsoleConfig ──► ApiClient ─┬─► CustomersScreen                      │
//! │                     (one pool, ├─► ProductsScreen                       │
//! │                      one cache)├─► InventoryScreen ─┐  product lookup   │
//! │                                ├─► SalesScreen ─────┤  read from the    │
//! │                                └─► Dashboard        ┘  shared cache     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Every screen built from the same [`Console`] shares the client's query
//! cache, so a product saved on one screen is seen by the selectors of the
//! others.

pub mod cli;
pub mod error;
pub mod notify;
pub mod screens;

use tracing::info;
use tracing_subscriber::EnvFilter;

use deli_api::{ApiClient, ApiResult, ConsoleConfig};
use deli_core::Entity;

pub use error::{ConsoleError, ConsoleResult, ErrorCode};
pub use notify::{Level, Notification};
pub use screens::{
    CustomersScreen, Dashboard, InventoryScreen, ProductsScreen, SalesScreen, Screen,
};

/// Configuration plus the shared API client.
#[derive(Debug, Clone)]
pub struct Console {
    config: ConsoleConfig,
    client: ApiClient,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> ApiResult<Self> {
        let client = ApiClient::new(&config.api)?;
        info!(base_url = %client.base_url(), "Console ready");
        Ok(Console { config, client })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Generic screen for any resource.
    pub fn screen<E: Entity>(&self) -> Screen<E> {
        Screen::new(&self.client, self.config.edit_policy())
    }

    pub fn customers(&self) -> CustomersScreen {
        self.screen()
    }

    pub fn products(&self) -> ProductsScreen {
        self.screen()
    }

    pub fn inventory(&self) -> InventoryScreen {
        InventoryScreen::new(&self.client, self.config.edit_policy())
    }

    pub fn sales(&self) -> SalesScreen {
        SalesScreen::new(&self.client, self.config.edit_policy())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(&self.client, self.config.forecast.horizon)
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=deli=trace` - Show trace for deli crates only
/// - Default: INFO, with debug for the deli crates
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,deli=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
