//! # Entity Contract
//!
//! One trait ties a backend resource to its record, draft and payload types.
//! The generic repository (deli-api) and the generic screen (console) are
//! written once against it.
//!
//! ```text
//! ┌───────────────┬──────────────┬────────────────┬────────────────────────┐
//! │ Record        │ RESOURCE     │ Draft          │ search matches         │
//! ├───────────────┼──────────────┼────────────────┼────────────────────────┤
//! │ Customer      │ clientes     │ CustomerDraft  │ nombre, correo         │
//! │ Product       │ productos    │ ProductDraft   │ nombre, categoria      │
//! │ InventoryRec. │ inventario   │ InventoryDraft │ nombre_producto        │
//! │ Sale          │ ventas       │ SaleDraft      │ cliente, método, estado│
//! └───────────────┴──────────────┴────────────────┴────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::coerce::parse_count_or_zero;
use crate::error::ValidationResult;
use crate::sale::SaleDraft;
use crate::types::{
    Customer, CustomerDraft, CustomerPayload, InventoryDraft, InventoryPayload, InventoryRecord,
    Product, ProductDraft, ProductPayload, RecordId, Sale, SalePayload,
};
use crate::validation::{validate_customer, validate_inventory, validate_product};

/// How an existing record is turned back into form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditPolicy {
    /// Repopulate a sale's lines from `detalles` instead of starting empty.
    pub reload_sale_lines: bool,
}

/// A record type stored under one REST resource.
pub trait Entity: Clone + Send + Sync + DeserializeOwned + 'static {
    /// Collection path segment, e.g. `clientes`.
    const RESOURCE: &'static str;

    /// Singular name for messages ("Customer created").
    const LABEL: &'static str;

    /// Form state.
    type Draft: Default + Clone + Send + Sync;

    /// Request body for create and update.
    type Payload: Serialize + Send + Sync;

    fn id(&self) -> RecordId;

    /// Validates and coerces a draft into a request body.
    fn to_payload(draft: &Self::Draft) -> ValidationResult<Self::Payload>;

    /// Form state for editing this record.
    fn draft_for_edit(&self, policy: EditPolicy) -> Self::Draft;

    /// Search predicate. `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Lowercased search text, or `None` when the filter is blank.
pub fn normalize_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Records matching a free-text filter, in their original order.
pub fn filter_records<'a, E: Entity>(records: &'a [E], raw_search: &str) -> Vec<&'a E> {
    match normalize_search(raw_search) {
        None => records.iter().collect(),
        Some(needle) => records.iter().filter(|r| r.matches(&needle)).collect(),
    }
}

// =============================================================================
// Implementations
// =============================================================================

impl Entity for Customer {
    const RESOURCE: &'static str = "clientes";
    const LABEL: &'static str = "Customer";
    type Draft = CustomerDraft;
    type Payload = CustomerPayload;

    fn id(&self) -> RecordId {
        self.id_cliente
    }

    fn to_payload(draft: &CustomerDraft) -> ValidationResult<CustomerPayload> {
        validate_customer(draft)?;
        Ok(CustomerPayload {
            nombre: draft.nombre.clone(),
            telefono: draft.telefono.clone(),
            correo: draft.correo.clone(),
            direccion: draft.direccion.clone(),
        })
    }

    fn draft_for_edit(&self, _policy: EditPolicy) -> CustomerDraft {
        CustomerDraft {
            nombre: self.nombre.clone(),
            telefono: self.telefono.clone(),
            correo: self.correo.clone(),
            direccion: self.direccion.clone(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.nombre, needle) || contains(&self.correo, needle)
    }
}

impl Entity for Product {
    const RESOURCE: &'static str = "productos";
    const LABEL: &'static str = "Product";
    type Draft = ProductDraft;
    type Payload = ProductPayload;

    fn id(&self) -> RecordId {
        self.id_producto
    }

    fn to_payload(draft: &ProductDraft) -> ValidationResult<ProductPayload> {
        let precio_venta = validate_product(draft)?;
        Ok(ProductPayload {
            nombre: draft.nombre.clone(),
            categoria: draft.categoria.clone(),
            precio_venta,
            estado: draft.estado,
        })
    }

    fn draft_for_edit(&self, _policy: EditPolicy) -> ProductDraft {
        ProductDraft {
            nombre: self.nombre.clone(),
            categoria: self.categoria.clone(),
            precio_venta: self.precio_venta.to_decimal_string(),
            estado: self.estado,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.nombre, needle) || contains(&self.categoria, needle)
    }
}

impl Entity for InventoryRecord {
    const RESOURCE: &'static str = "inventario";
    const LABEL: &'static str = "Inventory record";
    type Draft = InventoryDraft;
    type Payload = InventoryPayload;

    fn id(&self) -> RecordId {
        self.id_inventario
    }

    fn to_payload(draft: &InventoryDraft) -> ValidationResult<InventoryPayload> {
        let id_producto = validate_inventory(draft)?;
        Ok(InventoryPayload {
            id_producto,
            cantidad_inicial: parse_count_or_zero(&draft.cantidad_inicial),
            entradas: parse_count_or_zero(&draft.entradas),
            salidas: parse_count_or_zero(&draft.salidas),
        })
    }

    fn draft_for_edit(&self, _policy: EditPolicy) -> InventoryDraft {
        InventoryDraft {
            id_producto: Some(self.id_producto),
            cantidad_inicial: self.cantidad_inicial.to_string(),
            entradas: self.entradas.to_string(),
            salidas: self.salidas.to_string(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.nombre_producto, needle)
    }
}

impl Entity for Sale {
    const RESOURCE: &'static str = "ventas";
    const LABEL: &'static str = "Sale";
    type Draft = SaleDraft;
    type Payload = SalePayload;

    fn id(&self) -> RecordId {
        self.id_venta
    }

    fn to_payload(draft: &SaleDraft) -> ValidationResult<SalePayload> {
        draft.submit()
    }

    fn draft_for_edit(&self, policy: EditPolicy) -> SaleDraft {
        SaleDraft::for_edit(self, policy)
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.cliente, needle)
            || contains(self.metodo_pago.label(), needle)
            || contains(self.estado.label(), needle)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::types::{PaymentMethod, ProductStatus, SaleStatus};

    fn customers() -> Vec<Customer> {
        vec![
            Customer {
                id_cliente: 1,
                nombre: "Ana Torres".to_string(),
                telefono: "987654321".to_string(),
                correo: "ana@mail.com".to_string(),
                direccion: String::new(),
            },
            Customer {
                id_cliente: 2,
                nombre: "Luis Pérez".to_string(),
                telefono: "912345678".to_string(),
                correo: "lperez@correo.pe".to_string(),
                direccion: String::new(),
            },
        ]
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let list = customers();
        assert_eq!(filter_records(&list, "").len(), 2);
        assert_eq!(filter_records(&list, "   ").len(), 2);
    }

    #[test]
    fn test_customer_search_is_case_insensitive() {
        let list = customers();
        let hits = filter_records(&list, "ANA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id_cliente, 1);

        let hits = filter_records(&list, "correo.pe");
        assert_eq!(hits[0].id_cliente, 2);

        assert_eq!(filter_records(&list, "PÉREZ").len(), 1);
    }

    #[test]
    fn test_sale_search_covers_method_and_status() {
        let sale = Sale {
            id_venta: 5,
            id_cliente: 1,
            cliente: "Ana Torres".to_string(),
            fecha: "2025-05-01".to_string(),
            metodo_pago: PaymentMethod::Yape,
            estado: SaleStatus::Pending,
            total: Money::from_cents(2500),
            detalles: vec![],
        };
        assert!(sale.matches("yape"));
        assert!(sale.matches("pendiente"));
        assert!(sale.matches("torres"));
        assert!(!sale.matches("tarjeta"));
    }

    #[test]
    fn test_customer_payload_is_the_form_fields() {
        let draft = customers()[0].draft_for_edit(EditPolicy::default());
        let payload = Customer::to_payload(&draft).unwrap();
        assert_eq!(payload.nombre, "Ana Torres");
        assert_eq!(payload.correo, "ana@mail.com");
    }

    #[test]
    fn test_product_round_trips_through_draft() {
        let product = Product {
            id_producto: 3,
            nombre: "Salame".to_string(),
            categoria: "Embutidos".to_string(),
            precio_venta: Money::from_cents(1890),
            estado: ProductStatus::Inactive,
        };
        let draft = product.draft_for_edit(EditPolicy::default());
        assert_eq!(draft.precio_venta, "18.90");

        let payload = Product::to_payload(&draft).unwrap();
        assert_eq!(payload.precio_venta, product.precio_venta);
        assert_eq!(payload.estado, ProductStatus::Inactive);
    }

    #[test]
    fn test_product_edit_keeps_sign_of_small_negative_price() {
        let product = Product {
            id_producto: 4,
            nombre: "Ajuste".to_string(),
            categoria: "Otros".to_string(),
            precio_venta: Money::from_cents(-50),
            estado: ProductStatus::Active,
        };
        let draft = product.draft_for_edit(EditPolicy::default());
        assert_eq!(draft.precio_venta, "-0.50");
    }

    #[test]
    fn test_inventory_payload_coerces_counts() {
        let draft = InventoryDraft {
            id_producto: Some(4),
            cantidad_inicial: "10".to_string(),
            entradas: "x".to_string(),
            salidas: "2".to_string(),
        };
        let payload = InventoryRecord::to_payload(&draft).unwrap();
        assert_eq!(payload.cantidad_inicial, 10);
        assert_eq!(payload.entradas, 0);
        assert_eq!(payload.salidas, 2);

        let err = InventoryRecord::to_payload(&InventoryDraft::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingProduct);
    }
}
