//! # Validation Module
//!
//! Field checks run on a draft before anything is sent to the backend.
//!
//! ## Where Validation Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client side)                                    │
//! │  ├── Required fields, name/email/phone shape                           │
//! │  └── Failure = blocking alert, no request is made                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend REST API                                             │
//! │  ├── NOT NULL / foreign key constraints                                │
//! │  └── Failure = 400/422 → ApiError::Rejected → toast                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator returns the FIRST failing rule, in the order documented
//! on the function.

use crate::coerce::parse_money_or_zero;
use crate::error::{ValidationError, ValidationResult};
use crate::types::{CustomerDraft, InventoryDraft, ProductDraft, RecordId};
use crate::money::Money;
use crate::{MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};

// =============================================================================
// Field Validators
// =============================================================================

/// Letters (ASCII plus Spanish accented vowels and ñ) and whitespace only.
///
/// ## Example
/// ```rust
/// use deli_core::validation::validate_name;
///
/// assert!(validate_name("María Núñez").is_ok());
/// assert!(validate_name("Ana2").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult {
    let allowed = |c: char| c.is_ascii_alphabetic() || "ÁÉÍÓÚáéíóúÑñ".contains(c) || c.is_whitespace();

    if name.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName)
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain with text on both sides of it.
///
/// ## Example
/// ```rust
/// use deli_core::validation::validate_email;
///
/// assert!(validate_email("ana@mail.com").is_ok());
/// assert!(validate_email("ana@mail").is_err());
/// assert!(validate_email("ana @mail.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult {
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::InvalidEmail);
    };

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail);
    }

    // Some dot must split the domain into two non-empty halves.
    let dotted = domain
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len());

    if dotted {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Between 6 and 15 ASCII digits, nothing else.
///
/// ## Example
/// ```rust
/// use deli_core::validation::validate_phone;
///
/// assert!(validate_phone("987654321").is_ok());
/// assert!(validate_phone("98765").is_err());
/// assert!(validate_phone("987-654-321").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult {
    let digits_only = phone.bytes().all(|b| b.is_ascii_digit());
    let len_ok = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&phone.len());

    if digits_only && len_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

fn require(value: &str, field: &str) -> ValidationResult {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

// =============================================================================
// Draft Validators
// =============================================================================

/// Validates a customer form.
///
/// ## Order
/// 1. `nombre` and `telefono` present → `MissingRequiredField`
/// 2. name characters → `InvalidName`
/// 3. email shape, only when one was entered → `InvalidEmail`
/// 4. phone digits → `InvalidPhone`
pub fn validate_customer(draft: &CustomerDraft) -> ValidationResult {
    require(&draft.nombre, "nombre")?;
    require(&draft.telefono, "telefono")?;
    validate_name(&draft.nombre)?;

    if !draft.correo.is_empty() {
        validate_email(&draft.correo)?;
    }

    validate_phone(&draft.telefono)
}

/// Validates a product form and returns the coerced price.
///
/// Unparsable prices coerce to zero; a negative price is rejected.
pub fn validate_product(draft: &ProductDraft) -> ValidationResult<Money> {
    require(&draft.nombre, "nombre")?;
    require(&draft.categoria, "categoria")?;

    let price = parse_money_or_zero(&draft.precio_venta);
    if price.is_negative() {
        return Err(ValidationError::negative("precio_venta"));
    }

    Ok(price)
}

/// Validates an inventory form and returns the selected product.
pub fn validate_inventory(draft: &InventoryDraft) -> ValidationResult<RecordId> {
    draft.id_producto.ok_or(ValidationError::MissingProduct)
}

/// Validates one pending sale line.
pub fn validate_line(
    product_id: Option<RecordId>,
    quantity: i64,
    unit_price: Money,
) -> ValidationResult<RecordId> {
    let product_id = product_id.ok_or(ValidationError::MissingProduct)?;

    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    if unit_price.is_negative() {
        return Err(ValidationError::negative("precio_unitario"));
    }

    Ok(product_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> CustomerDraft {
        CustomerDraft {
            nombre: "Ana Torres".to_string(),
            telefono: "987654321".to_string(),
            correo: "ana@mail.com".to_string(),
            direccion: "Av. Lima 123".to_string(),
        }
    }

    #[test]
    fn test_valid_customer() {
        assert!(validate_customer(&ana()).is_ok());
    }

    #[test]
    fn test_email_is_optional() {
        let draft = CustomerDraft {
            correo: String::new(),
            ..ana()
        };
        assert!(validate_customer(&draft).is_ok());
    }

    #[test]
    fn test_required_fields_checked_first() {
        let draft = CustomerDraft {
            nombre: String::new(),
            telefono: "abc".to_string(),
            ..ana()
        };
        assert_eq!(
            validate_customer(&draft),
            Err(ValidationError::missing("nombre"))
        );

        let draft = CustomerDraft {
            telefono: "   ".to_string(),
            ..ana()
        };
        assert_eq!(
            validate_customer(&draft),
            Err(ValidationError::missing("telefono"))
        );
    }

    #[test]
    fn test_name_before_email_before_phone() {
        let draft = CustomerDraft {
            nombre: "Ana_T".to_string(),
            correo: "bad".to_string(),
            telefono: "12".to_string(),
            ..ana()
        };
        assert_eq!(validate_customer(&draft), Err(ValidationError::InvalidName));

        let draft = CustomerDraft {
            correo: "bad".to_string(),
            telefono: "12".to_string(),
            ..ana()
        };
        assert_eq!(validate_customer(&draft), Err(ValidationError::InvalidEmail));

        let draft = CustomerDraft {
            telefono: "12".to_string(),
            ..ana()
        };
        assert_eq!(validate_customer(&draft), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_phone_lengths() {
        for len in 6..=15 {
            assert!(validate_phone(&"9".repeat(len)).is_ok(), "len {len}");
        }
        for len in [0, 1, 5, 16, 20] {
            assert_eq!(validate_phone(&"9".repeat(len)), Err(ValidationError::InvalidPhone));
        }
        assert_eq!(validate_phone("98765432a"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone("+51987654"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone("９８７６５４３"), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_names() {
        for ok in ["José Ñañez", "ÁÉÍÓÚ áéíóú", "Ana\tTorres"] {
            assert!(validate_name(ok).is_ok(), "{ok}");
        }
        for bad in ["Ana-Torres", "O'Brien", "Ana1", "Zoë", "Ana."] {
            assert_eq!(validate_name(bad), Err(ValidationError::InvalidName), "{bad}");
        }
    }

    #[test]
    fn test_emails() {
        for ok in ["a@b.co", "ana.torres@mail.com.pe", "x@sub.domain.org"] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
        for bad in ["@mail.com", "ana@", "ana@.com", "ana@com.", "a@b@c.com", "ana@mail"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn test_product_price_coercion() {
        let draft = ProductDraft {
            nombre: "Queso edam".to_string(),
            categoria: "Quesos".to_string(),
            precio_venta: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_product(&draft), Ok(Money::zero()));

        let draft = ProductDraft {
            precio_venta: "-1".to_string(),
            ..draft
        };
        assert!(matches!(
            validate_product(&draft),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_product_requires_category() {
        let draft = ProductDraft {
            nombre: "Queso edam".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_product(&draft),
            Err(ValidationError::missing("categoria"))
        );
    }

    #[test]
    fn test_inventory_requires_product() {
        assert_eq!(
            validate_inventory(&InventoryDraft::default()),
            Err(ValidationError::MissingProduct)
        );
    }

    #[test]
    fn test_line_rules() {
        let price = Money::from_cents(1000);
        assert_eq!(validate_line(None, 1, price), Err(ValidationError::MissingProduct));
        assert!(matches!(
            validate_line(Some(1), 0, price),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_line(Some(1), 1, Money::from_cents(-1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(validate_line(Some(1), 2, Money::zero()), Ok(1));
    }
}
