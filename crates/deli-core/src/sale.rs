//! # Sale Draft
//!
//! The sale being composed on the sales screen: a header plus the pending
//! line items, with a total derived from the lines.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Empty ──add_line──► HasLines ──select_customer──► Submittable         │
//! │     ▲                    │                              │               │
//! │     └────remove_line─────┘                              │               │
//! │                                                         │               │
//! │            cancel()  (from any state)                   │ submit() +    │
//! │               │                                         │ repository ok │
//! │               ▼                                         ▼               │
//! │          Cancelled                                  Submitted           │
//! │               │                                         │               │
//! │               └──── next mutation starts a fresh draft ─┘               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are never merged: the same product added twice is two lines
//! - The total is recomputed from the lines on every read, never stored
//! - Entering a terminal state clears the header and lines
//! - Every line total and the sale total fit in `i64` cents

use chrono::{Local, NaiveDate};

use crate::entity::EditPolicy;
use crate::error::{CoreError, CoreResult, ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{PaymentMethod, RecordId, Sale, SaleLine, SalePayload, SaleStatus};
use crate::validation::validate_line;

/// Where a draft is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// No lines yet (a customer may already be chosen).
    Empty,
    /// Lines, but no customer.
    HasLines,
    /// Lines and a customer: `submit()` will succeed.
    Submittable,
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closed {
    Submitted,
    Cancelled,
}

/// A sale under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    customer: Option<RecordId>,
    fecha: NaiveDate,
    metodo_pago: PaymentMethod,
    estado: SaleStatus,
    lines: Vec<SaleLine>,
    closed: Option<Closed>,
}

impl Default for SaleDraft {
    fn default() -> Self {
        SaleDraft::new()
    }
}

impl SaleDraft {
    /// Creates an empty draft dated today.
    pub fn new() -> Self {
        SaleDraft::dated(Local::now().date_naive())
    }

    /// Creates an empty draft with the given date.
    pub fn dated(fecha: NaiveDate) -> Self {
        SaleDraft {
            customer: None,
            fecha,
            metodo_pago: PaymentMethod::default(),
            estado: SaleStatus::default(),
            lines: Vec::new(),
            closed: None,
        }
    }

    /// Loads an existing sale for editing.
    ///
    /// Only the header is restored unless `policy.reload_sale_lines` is set
    /// and the record carries its `detalles`. Reloaded lines go through the
    /// same checks as [`SaleDraft::add_line`]; a stored line that would be
    /// rejected there is dropped.
    pub fn for_edit(sale: &Sale, policy: EditPolicy) -> Self {
        let fecha = sale.date().unwrap_or_else(|| Local::now().date_naive());
        let mut draft = SaleDraft::dated(fecha);
        draft.customer = Some(sale.id_cliente);
        draft.metodo_pago = sale.metodo_pago;
        draft.estado = sale.estado;
        if policy.reload_sale_lines {
            for line in &sale.detalles {
                // Rejected lines are skipped, the rest still load.
                let _ =
                    draft.push_line(Some(line.id_producto), line.cantidad, line.precio_unitario);
            }
        }
        draft
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> DraftState {
        match self.closed {
            Some(Closed::Submitted) => DraftState::Submitted,
            Some(Closed::Cancelled) => DraftState::Cancelled,
            None if self.lines.is_empty() => DraftState::Empty,
            None if self.customer.is_none() => DraftState::HasLines,
            None => DraftState::Submittable,
        }
    }

    pub fn customer(&self) -> Option<RecordId> {
        self.customer
    }

    pub fn fecha(&self) -> NaiveDate {
        self.fecha
    }

    pub fn metodo_pago(&self) -> PaymentMethod {
        self.metodo_pago
    }

    pub fn estado(&self) -> SaleStatus {
        self.estado
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Σ `cantidad × precio_unitario`; zero with no lines.
    ///
    /// Saturates at the largest representable amount. Lines only enter
    /// through [`SaleDraft::add_line`], which keeps the exact total in
    /// range, so this is exact for any draft built through the public API.
    pub fn compute_total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |total, line| total.saturating_add(line.line_total()))
    }

    /// Exact total, or `None` if it does not fit in `i64` cents.
    pub fn checked_total(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::zero(), |total, line| {
            total.checked_add(line.checked_total()?)
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn select_customer(&mut self, customer: Option<RecordId>) {
        self.reopen();
        self.customer = customer;
    }

    pub fn set_date(&mut self, fecha: NaiveDate) {
        self.reopen();
        self.fecha = fecha;
    }

    pub fn set_payment_method(&mut self, metodo_pago: PaymentMethod) {
        self.reopen();
        self.metodo_pago = metodo_pago;
    }

    pub fn set_status(&mut self, estado: SaleStatus) {
        self.reopen();
        self.estado = estado;
    }

    /// Appends a line after validating it.
    ///
    /// ## Errors
    /// - `MissingProduct` when no product is selected
    /// - `MustBePositive` when `quantity < 1`
    /// - `OutOfRange` when the unit price is negative
    /// - `OutOfRange` on `total` when the line or the new sale total does
    ///   not fit in `i64` cents
    pub fn add_line(
        &mut self,
        product_id: Option<RecordId>,
        quantity: i64,
        unit_price: Money,
    ) -> ValidationResult {
        self.push_line(product_id, quantity, unit_price)?;
        self.reopen();
        Ok(())
    }

    fn push_line(
        &mut self,
        product_id: Option<RecordId>,
        quantity: i64,
        unit_price: Money,
    ) -> ValidationResult {
        let id_producto = validate_line(product_id, quantity, unit_price)?;
        let line = SaleLine {
            id_producto,
            cantidad: quantity,
            precio_unitario: unit_price,
        };
        self.checked_total()
            .zip(line.checked_total())
            .and_then(|(total, subtotal)| total.checked_add(subtotal))
            .ok_or_else(ValidationError::total_overflow)?;
        self.lines.push(line);
        Ok(())
    }

    /// Removes the line at `index` and returns it.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<SaleLine> {
        self.reopen();
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Builds the request body for the repository.
    ///
    /// Does not change the draft. Call [`SaleDraft::mark_submitted`] once
    /// the repository call succeeds.
    ///
    /// ## Errors
    /// - `NoLineItems` when there are no lines, whatever the header holds
    /// - `MissingCustomer` when no customer is selected
    /// - `OutOfRange` on `total` when the total does not fit in `i64` cents
    pub fn submit(&self) -> ValidationResult<SalePayload> {
        if self.lines.is_empty() {
            return Err(ValidationError::NoLineItems);
        }
        let id_cliente = self.customer.ok_or(ValidationError::MissingCustomer)?;
        let total = self
            .checked_total()
            .ok_or_else(ValidationError::total_overflow)?;

        Ok(SalePayload {
            id_cliente,
            fecha: self.fecha,
            metodo_pago: self.metodo_pago,
            estado: self.estado,
            detalles: self.lines.clone(),
            total,
        })
    }

    /// Clears the draft after a successful save.
    pub fn mark_submitted(&mut self) {
        self.close(Closed::Submitted);
    }

    /// Clears the draft and marks it abandoned.
    pub fn cancel(&mut self) {
        self.close(Closed::Cancelled);
    }

    fn close(&mut self, how: Closed) {
        *self = SaleDraft::new();
        self.closed = Some(how);
    }

    /// A terminal draft accepts edits by becoming a fresh one.
    fn reopen(&mut self) {
        self.closed = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn soles(n: i64) -> Money {
        Money::from_major_minor(n, 0)
    }

    #[test]
    fn test_state_progression() {
        let mut draft = SaleDraft::dated(may_first());
        assert_eq!(draft.state(), DraftState::Empty);

        draft.select_customer(Some(3));
        assert_eq!(draft.state(), DraftState::Empty);

        draft.select_customer(None);
        draft.add_line(Some(1), 2, soles(10)).unwrap();
        assert_eq!(draft.state(), DraftState::HasLines);

        draft.select_customer(Some(3));
        assert_eq!(draft.state(), DraftState::Submittable);
    }

    #[test]
    fn test_total_is_additive() {
        let mut draft = SaleDraft::dated(may_first());
        draft.add_line(Some(1), 2, soles(10)).unwrap();
        let before = draft.compute_total();

        draft.add_line(Some(2), 3, Money::from_cents(450)).unwrap();
        assert_eq!(draft.compute_total() - before, Money::from_cents(1350));

        draft.remove_line(1).unwrap();
        assert_eq!(draft.compute_total(), before);
    }

    #[test]
    fn test_same_product_is_not_merged() {
        let mut draft = SaleDraft::dated(may_first());
        draft.add_line(Some(1), 1, soles(5)).unwrap();
        draft.add_line(Some(1), 1, soles(5)).unwrap();
        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.compute_total(), soles(10));
    }

    #[test]
    fn test_rejected_line_leaves_draft_alone() {
        let mut draft = SaleDraft::dated(may_first());
        assert_eq!(
            draft.add_line(None, 1, soles(5)),
            Err(ValidationError::MissingProduct)
        );
        assert!(draft.add_line(Some(1), 0, soles(5)).is_err());
        assert!(draft.lines().is_empty());
        assert!(draft.compute_total().is_zero());
    }

    #[test]
    fn test_submit_without_lines_always_reports_no_lines() {
        let mut draft = SaleDraft::dated(may_first());
        assert_eq!(draft.submit(), Err(ValidationError::NoLineItems));

        draft.select_customer(Some(3));
        draft.set_payment_method(PaymentMethod::Card);
        assert_eq!(draft.submit(), Err(ValidationError::NoLineItems));
    }

    #[test]
    fn test_submit_requires_customer() {
        let mut draft = SaleDraft::dated(may_first());
        draft.add_line(Some(1), 1, soles(5)).unwrap();
        assert_eq!(draft.submit(), Err(ValidationError::MissingCustomer));
    }

    #[test]
    fn test_submit_payload() {
        let mut draft = SaleDraft::dated(may_first());
        draft.select_customer(Some(3));
        draft.add_line(Some(1), 2, soles(10)).unwrap();
        draft.add_line(Some(2), 1, soles(5)).unwrap();

        let payload = draft.submit().unwrap();
        assert_eq!(payload.total, soles(25));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "id_cliente": 3,
                "fecha": "2025-05-01",
                "metodo_pago": "Efectivo",
                "estado": "Pagado",
                "detalles": [
                    {"id_producto": 1, "cantidad": 2, "precio_unitario": 10},
                    {"id_producto": 2, "cantidad": 1, "precio_unitario": 5}
                ],
                "total": 25
            })
        );

        // Building the payload does not consume the draft.
        assert_eq!(draft.state(), DraftState::Submittable);
    }

    #[test]
    fn test_mark_submitted_resets() {
        let mut draft = SaleDraft::dated(may_first());
        draft.select_customer(Some(3));
        draft.add_line(Some(1), 2, soles(10)).unwrap();

        draft.mark_submitted();
        assert_eq!(draft.state(), DraftState::Submitted);
        assert!(draft.lines().is_empty());
        assert_eq!(draft.customer(), None);

        draft.add_line(Some(4), 1, soles(1)).unwrap();
        assert_eq!(draft.state(), DraftState::HasLines);
    }

    #[test]
    fn test_cancel() {
        let mut draft = SaleDraft::dated(may_first());
        draft.add_line(Some(1), 2, soles(10)).unwrap();
        draft.cancel();
        assert_eq!(draft.state(), DraftState::Cancelled);
        assert!(draft.compute_total().is_zero());
    }

    #[test]
    fn test_remove_missing_line() {
        let mut draft = SaleDraft::dated(may_first());
        assert!(matches!(
            draft.remove_line(0),
            Err(CoreError::LineNotFound { index: 0, len: 0 })
        ));
    }

    fn stored_sale() -> Sale {
        Sale {
            id_venta: 9,
            id_cliente: 3,
            cliente: "Ana Torres".to_string(),
            fecha: "2025-04-12T05:00:00.000Z".to_string(),
            metodo_pago: PaymentMethod::Yape,
            estado: SaleStatus::Pending,
            total: soles(25),
            detalles: vec![SaleLine {
                id_producto: 1,
                cantidad: 2,
                precio_unitario: soles(10),
            }],
        }
    }

    #[test]
    fn test_edit_restores_header_only() {
        let draft = SaleDraft::for_edit(&stored_sale(), EditPolicy::default());
        assert_eq!(draft.customer(), Some(3));
        assert_eq!(draft.fecha(), NaiveDate::from_ymd_opt(2025, 4, 12).unwrap());
        assert_eq!(draft.metodo_pago(), PaymentMethod::Yape);
        assert_eq!(draft.estado(), SaleStatus::Pending);
        assert!(draft.lines().is_empty());
        assert_eq!(draft.state(), DraftState::Empty);
    }

    #[test]
    fn test_edit_can_reload_lines() {
        let policy = EditPolicy {
            reload_sale_lines: true,
        };
        let draft = SaleDraft::for_edit(&stored_sale(), policy);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.compute_total(), soles(20));
        assert_eq!(draft.state(), DraftState::Submittable);
    }

    fn total_overflow() -> ValidationError {
        ValidationError::OutOfRange {
            field: "total".to_string(),
            min: 0,
            max: i64::MAX,
        }
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        let mut draft = SaleDraft::dated(may_first());
        draft.select_customer(Some(3));

        let result = draft.add_line(Some(1), 100_000_000_000_000_000, soles(10));
        assert_eq!(result, Err(total_overflow()));
        assert!(draft.lines().is_empty());
        assert!(draft.compute_total().is_zero());
        assert_eq!(draft.submit(), Err(ValidationError::NoLineItems));
    }

    #[test]
    fn test_lines_that_overflow_together_are_rejected() {
        let mut draft = SaleDraft::dated(may_first());
        draft.select_customer(Some(3));
        let big = Money::from_cents(i64::MAX / 2 + 1);

        draft.add_line(Some(1), 1, big).unwrap();
        assert_eq!(draft.add_line(Some(2), 1, big), Err(total_overflow()));
        assert_eq!(draft.lines().len(), 1);

        let payload = draft.submit().unwrap();
        assert_eq!(payload.total, big);
    }

    #[test]
    fn test_edit_drops_lines_that_cannot_be_added() {
        let policy = EditPolicy {
            reload_sale_lines: true,
        };
        let mut sale = stored_sale();
        sale.detalles.push(SaleLine {
            id_producto: 2,
            cantidad: 100_000_000_000_000_000,
            precio_unitario: soles(10),
        });
        sale.detalles.push(SaleLine {
            id_producto: 3,
            cantidad: 0,
            precio_unitario: soles(1),
        });

        let draft = SaleDraft::for_edit(&sale, policy);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].id_producto, 1);
        assert_eq!(draft.submit().unwrap().total, soles(20));
    }
}
