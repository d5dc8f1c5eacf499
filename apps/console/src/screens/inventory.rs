//! # Inventory Screen
//!
//! The generic screen over `inventario`, with the product list the form's
//! selector is filled from. Stock figures are shown as the backend reports
//! them.

use std::sync::Arc;

use deli_api::ApiClient;
use deli_core::{EditPolicy, InventoryRecord, Product, ValidationError};

use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::Notification;
use crate::screens::screen::Screen;

/// Inventory screen controller.
pub struct InventoryScreen {
    screen: Screen<InventoryRecord>,
    client: ApiClient,
    products: Arc<Vec<Product>>,
}

impl InventoryScreen {
    pub fn new(client: &ApiClient, policy: EditPolicy) -> Self {
        InventoryScreen {
            screen: Screen::new(client, policy),
            client: client.clone(),
            products: Arc::default(),
        }
    }

    pub fn screen(&self) -> &Screen<InventoryRecord> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen<InventoryRecord> {
        &mut self.screen
    }

    /// Loads inventory and the cached product list.
    pub async fn load(&mut self) -> ConsoleResult<()> {
        match self.client.repository::<Product>().cached().await {
            Ok(products) => self.products = products,
            Err(e) => self.screen.notify(ConsoleError::from(e).notification()),
        }
        self.screen.load().await
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Sends the form once its product is known to exist.
    pub async fn submit(&mut self) -> ConsoleResult<()> {
        if let Some(id) = self.screen.draft().id_producto {
            if !self.products.iter().any(|p| p.id_producto == id) {
                let err = ConsoleError::from(ValidationError::UnknownProduct(id));
                self.screen.notify(err.notification());
                return Err(err);
            }
        }
        self.screen.submit().await
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.screen.take_notifications()
    }
}
