//! # Sales Screen
//!
//! The generic screen over `ventas`, plus the pieces a sale form needs:
//! customer and product lookups, and line editing on the draft.
//!
//! ```text
//! ┌──────────────────────────── New sale ─────────────────────────────┐
//! │ Cliente [Ana Torres ▾]  Fecha [2025-05-01]  Pago [Yape ▾]          │
//! │                                                                    │
//! │ Producto [Salame ▾]  Cantidad [2]  Precio [10.00]   (add_line)     │
//! │ ┌───────────────┬──────────┬──────────┬──────────┐                 │
//! │ │ Salame        │ 2        │ S/ 10.00 │ S/ 20.00 │  ✖ remove_line  │
//! │ │ Queso edam    │ 1        │ S/ 5.00  │ S/ 5.00  │  ✖              │
//! │ └───────────────┴──────────┴──────────┴──────────┘                 │
//! │                                     Total: S/ 25.00                │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::NaiveDate;

use deli_api::ApiClient;
use deli_core::{
    Customer, EditPolicy, Money, PaymentMethod, Product, RecordId, Sale, SaleDraft, SaleLine,
    SaleStatus, ValidationError,
};

use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::Notification;
use crate::screens::screen::{Modal, Screen};

/// Shown when a line or sale points at a record that is not loaded.
pub const MISSING_NAME: &str = "N/A";

/// One pending line, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub product_name: String,
    pub cantidad: i64,
    pub precio_unitario: Money,
    pub subtotal: Money,
}

/// Sales screen controller.
pub struct SalesScreen {
    screen: Screen<Sale>,
    client: ApiClient,
    customers: Arc<Vec<Customer>>,
    products: Arc<Vec<Product>>,
}

impl SalesScreen {
    pub fn new(client: &ApiClient, policy: EditPolicy) -> Self {
        SalesScreen {
            screen: Screen::new(client, policy),
            client: client.clone(),
            customers: Arc::default(),
            products: Arc::default(),
        }
    }

    /// The underlying list/modal controller.
    pub fn screen(&self) -> &Screen<Sale> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen<Sale> {
        &mut self.screen
    }

    /// Loads sales and the customer/product lookups.
    ///
    /// Lookups come from the shared query cache. A failed lookup leaves the
    /// previous one in place and queues its own toast.
    pub async fn load(&mut self) -> ConsoleResult<()> {
        match self.client.repository::<Customer>().cached().await {
            Ok(customers) => self.customers = customers,
            Err(e) => self.screen.notify(ConsoleError::from(e).notification()),
        }
        match self.client.repository::<Product>().cached().await {
            Ok(products) => self.products = products,
            Err(e) => self.screen.notify(ConsoleError::from(e).notification()),
        }
        self.screen.load().await
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn customer_name(&self, id: RecordId) -> &str {
        self.customers
            .iter()
            .find(|c| c.id_cliente == id)
            .map_or(MISSING_NAME, |c| c.nombre.as_str())
    }

    pub fn product_name(&self, id: RecordId) -> &str {
        self.products
            .iter()
            .find(|p| p.id_producto == id)
            .map_or(MISSING_NAME, |p| p.nombre.as_str())
    }

    /// Sale price of a loaded product, to prefill the unit price box.
    pub fn list_price(&self, id: RecordId) -> Option<Money> {
        self.products
            .iter()
            .find(|p| p.id_producto == id)
            .map(|p| p.precio_venta)
    }

    // =========================================================================
    // Form
    // =========================================================================

    pub fn open_create(&mut self) {
        self.screen.open_create();
    }

    /// Opens a stored sale; lines follow the configured edit policy.
    pub fn open_edit(&mut self, id: RecordId) -> ConsoleResult<()> {
        self.screen.open_edit(id)
    }

    /// Closes the form, abandoning the draft.
    pub fn close_modal(&mut self) {
        self.screen.close_modal();
        self.screen.draft_mut().cancel();
    }

    pub fn draft(&self) -> &SaleDraft {
        self.screen.draft()
    }

    pub fn select_customer(&mut self, id: Option<RecordId>) {
        self.screen.draft_mut().select_customer(id);
    }

    pub fn set_date(&mut self, fecha: NaiveDate) {
        self.screen.draft_mut().set_date(fecha);
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.screen.draft_mut().set_payment_method(method);
    }

    pub fn set_status(&mut self, status: SaleStatus) {
        self.screen.draft_mut().set_status(status);
    }

    /// Adds a pending line for a loaded product.
    ///
    /// Invalid lines queue an alert and leave the draft unchanged.
    pub fn add_line(
        &mut self,
        product_id: Option<RecordId>,
        quantity: i64,
        unit_price: Money,
    ) -> ConsoleResult<()> {
        let result = match product_id {
            Some(id) if !self.products.iter().any(|p| p.id_producto == id) => {
                Err(ValidationError::UnknownProduct(id))
            }
            _ => self
                .screen
                .draft_mut()
                .add_line(product_id, quantity, unit_price),
        };

        result.map_err(|e| {
            let err = ConsoleError::from(e);
            self.screen.notify(err.notification());
            err
        })
    }

    pub fn remove_line(&mut self, index: usize) -> ConsoleResult<SaleLine> {
        Ok(self.screen.draft_mut().remove_line(index)?)
    }

    /// Pending lines with product names ("N/A" for unknown products).
    pub fn line_views(&self) -> Vec<LineView> {
        self.draft()
            .lines()
            .iter()
            .map(|line| LineView {
                product_name: self.product_name(line.id_producto).to_string(),
                cantidad: line.cantidad,
                precio_unitario: line.precio_unitario,
                subtotal: line.line_total(),
            })
            .collect()
    }

    pub fn total(&self) -> Money {
        self.draft().compute_total()
    }

    /// Sends the sale. On success the draft ends up `Submitted` and empty.
    pub async fn submit(&mut self) -> ConsoleResult<()> {
        self.screen.submit().await?;
        self.screen.draft_mut().mark_submitted();
        Ok(())
    }

    pub async fn delete(&mut self, id: RecordId) -> ConsoleResult<()> {
        self.screen.delete(id).await
    }

    pub fn is_open(&self) -> bool {
        matches!(self.screen.modal(), Modal::Open { .. })
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.screen.take_notifications()
    }
}
