//! # Screens
//!
//! One controller per console page.
//!
//! ```text
//! screens/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── screen.rs     ◄─── Generic list + search + modal form controller
//! ├── inventory.rs  ◄─── Inventory, with the product selector
//! ├── sales.rs      ◄─── Sales, with customer/product lookups and lines
//! └── dashboard.rs  ◄─── Report totals and sales forecast
//! ```
//!
//! Customers and products need nothing beyond the generic controller, so
//! they are plain aliases.

pub mod dashboard;
pub mod inventory;
pub mod sales;
pub mod screen;

use deli_core::{Customer, Product};

pub use dashboard::{Dashboard, DashboardView};
pub use inventory::InventoryScreen;
pub use sales::{LineView, SalesScreen};
pub use screen::{LoadTicket, Modal, Screen, SubmitTicket};

pub type CustomersScreen = Screen<Customer>;
pub type ProductsScreen = Screen<Product>;
