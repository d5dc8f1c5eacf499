//! # Domain Types
//!
//! Records, drafts and payloads for the four backend resources.
//!
//! ## Three Shapes per Entity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Record  ◄─── GET /{resource}          what the backend stores         │
//! │     │                                                                   │
//! │     │ draft_for_edit                                                    │
//! │     ▼                                                                   │
//! │   Draft           raw form fields, numbers still text                   │
//! │     │                                                                   │
//! │     │ validate + coerce                                                 │
//! │     ▼                                                                   │
//! │   Payload ───► POST /{resource}, PUT /{resource}/{id}                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names are the backend's own (Spanish) column names so the serde
//! mapping stays one to one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

/// Backend-assigned row id.
pub type RecordId = i64;

// =============================================================================
// Lenient Decoding
// =============================================================================

/// Deserializers for columns the backend is loose about.
///
/// Postgres `NUMERIC` and `SUM(...)` results arrive as strings, optional
/// text columns arrive as `null`.
pub mod lenient {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Deserialize;
    use std::fmt;

    /// `null` becomes `T::default()`.
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Integer from a number, a numeric string or `null` (as 0).
    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(IntVisitor)
    }

    /// Float from a number, a numeric string or `null` (as 0.0).
    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or integer string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom("integer out of range"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            let trimmed = v.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
                .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }
    }
}

// =============================================================================
// Closed Enums
// =============================================================================

/// Whether a product is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "Activo")]
    Active,
    #[serde(rename = "Inactivo")]
    Inactive,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 2] = [ProductStatus::Active, ProductStatus::Inactive];

    /// Label as stored by the backend.
    pub const fn label(&self) -> &'static str {
        match self {
            ProductStatus::Active => "Activo",
            ProductStatus::Inactive => "Inactivo",
        }
    }
}

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Efectivo")]
    Cash,
    /// Peruvian mobile wallet.
    #[serde(rename = "Yape")]
    Yape,
    #[serde(rename = "Transferencia")]
    Transfer,
    #[serde(rename = "Tarjeta")]
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Yape,
        PaymentMethod::Transfer,
        PaymentMethod::Card,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Yape => "Yape",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Card => "Tarjeta",
        }
    }
}

/// Settlement status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SaleStatus {
    #[default]
    #[serde(rename = "Pagado")]
    Paid,
    #[serde(rename = "Pendiente")]
    Pending,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 2] = [SaleStatus::Paid, SaleStatus::Pending];

    pub const fn label(&self) -> &'static str {
        match self {
            SaleStatus::Paid => "Pagado",
            SaleStatus::Pending => "Pendiente",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(ProductStatus, PaymentMethod, SaleStatus);

// =============================================================================
// Customer
// =============================================================================

/// A customer row from `GET /clientes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id_cliente: RecordId,
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub telefono: String,
    /// Optional; an empty string when absent.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub correo: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub direccion: String,
}

/// Customer form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub nombre: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
}

/// Body of `POST /clientes` and `PUT /clientes/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPayload {
    pub nombre: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product row from `GET /productos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id_producto: RecordId,
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub categoria: String,
    #[serde(default)]
    pub precio_venta: Money,
    /// Rows created before the status column existed come back as `null`.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub estado: ProductStatus,
}

/// Product form fields. The price is kept as typed text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub nombre: String,
    pub categoria: String,
    pub precio_venta: String,
    pub estado: ProductStatus,
}

/// Body of `POST /productos` and `PUT /productos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    pub nombre: String,
    pub categoria: String,
    pub precio_venta: Money,
    pub estado: ProductStatus,
}

// =============================================================================
// Inventory
// =============================================================================

/// An inventory row from `GET /inventario`.
///
/// `stock_actual` and `nombre_producto` are computed by the backend and are
/// shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id_inventario: RecordId,
    pub id_producto: RecordId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub nombre_producto: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub cantidad_inicial: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub entradas: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub salidas: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub stock_actual: i64,
}

/// Inventory form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryDraft {
    pub id_producto: Option<RecordId>,
    pub cantidad_inicial: String,
    pub entradas: String,
    pub salidas: String,
}

/// Body of `POST /inventario` and `PUT /inventario/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryPayload {
    pub id_producto: RecordId,
    pub cantidad_inicial: i64,
    pub entradas: i64,
    pub salidas: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// One product line of a sale, as sent and as returned in `detalles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub id_producto: RecordId,
    #[serde(deserialize_with = "lenient::int")]
    pub cantidad: i64,
    pub precio_unitario: Money,
}

impl SaleLine {
    /// `cantidad × precio_unitario`, saturating on overflow.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.precio_unitario.multiply_quantity(self.cantidad)
    }

    /// `cantidad × precio_unitario`, or `None` if it does not fit.
    #[inline]
    pub fn checked_total(&self) -> Option<Money> {
        self.precio_unitario.checked_multiply_quantity(self.cantidad)
    }
}

/// A sale row from `GET /ventas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id_venta: RecordId,
    pub id_cliente: RecordId,
    /// Customer display name joined in by the backend.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub cliente: String,
    /// ISO date or timestamp, e.g. `2025-05-01T05:00:00.000Z`.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub metodo_pago: PaymentMethod,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub estado: SaleStatus,
    #[serde(default)]
    pub total: Money,
    /// Only some backend builds include the lines in the listing.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub detalles: Vec<SaleLine>,
}

impl Sale {
    /// Calendar date of the sale, taken from the part of `fecha` before `T`.
    pub fn date(&self) -> Option<NaiveDate> {
        let day = self.fecha.split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").ok()
    }
}

/// Body of `POST /ventas` and `PUT /ventas/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalePayload {
    pub id_cliente: RecordId,
    pub fecha: NaiveDate,
    pub metodo_pago: PaymentMethod,
    pub estado: SaleStatus,
    pub detalles: Vec<SaleLine>,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_wire_labels() {
        assert_eq!(serde_json::to_value(PaymentMethod::Transfer).unwrap(), json!("Transferencia"));
        assert_eq!(serde_json::to_value(SaleStatus::Pending).unwrap(), json!("Pendiente"));
        assert_eq!(ProductStatus::Inactive.to_string(), "Inactivo");

        let method: PaymentMethod = serde_json::from_value(json!("Yape")).unwrap();
        assert_eq!(method, PaymentMethod::Yape);
        assert!(serde_json::from_value::<SaleStatus>(json!("Anulado")).is_err());
    }

    #[test]
    fn test_product_tolerates_null_status_and_string_price() {
        let product: Product = serde_json::from_value(json!({
            "id_producto": 4,
            "nombre": "Jamón inglés",
            "categoria": "Embutidos",
            "precio_venta": "32.50",
            "estado": null
        }))
        .unwrap();

        assert_eq!(product.precio_venta.cents(), 3250);
        assert_eq!(product.estado, ProductStatus::Active);
    }

    #[test]
    fn test_inventory_counts_from_strings() {
        let record: InventoryRecord = serde_json::from_value(json!({
            "id_inventario": 1,
            "id_producto": 4,
            "nombre_producto": "Jamón inglés",
            "cantidad_inicial": 10,
            "entradas": "5",
            "salidas": 3,
            "stock_actual": "12"
        }))
        .unwrap();

        assert_eq!(record.entradas, 5);
        assert_eq!(record.stock_actual, 12);
    }

    #[test]
    fn test_sale_date_from_timestamp() {
        let sale: Sale = serde_json::from_value(json!({
            "id_venta": 7,
            "id_cliente": 3,
            "cliente": "Ana Torres",
            "fecha": "2025-05-01T05:00:00.000Z",
            "metodo_pago": "Tarjeta",
            "estado": "Pagado",
            "total": "25.00"
        }))
        .unwrap();

        assert_eq!(sale.date(), NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(sale.total.cents(), 2500);
        assert!(sale.detalles.is_empty());
    }

    #[test]
    fn test_line_total() {
        let line = SaleLine {
            id_producto: 1,
            cantidad: 3,
            precio_unitario: Money::from_cents(450),
        };
        assert_eq!(line.line_total().cents(), 1350);
        assert_eq!(line.checked_total(), Some(Money::from_cents(1350)));

        let huge = SaleLine {
            cantidad: 100_000_000_000_000_000,
            ..line
        };
        assert_eq!(huge.checked_total(), None);
        assert_eq!(huge.line_total().cents(), i64::MAX);
    }
}
