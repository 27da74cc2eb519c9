//! # Validation Module
//!
//! Input validation for everything the engine writes or queries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Query Facade (backoffice-api)                                │
//! │  ├── Type validation (deserialization into Decimal prices)             │
//! │  └── Calls into THIS MODULE                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Business rules (positive quantities, non-empty sales, ...)        │
//! │  └── Runs before any store access                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::validation::{validate_category_name, validate_quantity};
//!
//! validate_category_name("Electronics").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Price;
use crate::types::{NewCategory, NewProduct, NewSale, StockUpdate};
use crate::{MAX_CATEGORY_NAME_LEN, MAX_EMAIL_LEN, MAX_PAYMENT_METHOD_LEN, MAX_PRODUCT_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a category name (required, at most 100 characters).
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_CATEGORY_NAME_LEN)
}

/// Validates a product name (required, at most 255 characters).
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Kettle 1.7L").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates an optional payment method label.
pub fn validate_payment_method(method: Option<&str>) -> ValidationResult<()> {
    match method {
        Some(m) if m.trim().chars().count() > MAX_PAYMENT_METHOD_LEN => Err(ValidationError::TooLong {
            field: "payment_method".to_string(),
            max: MAX_PAYMENT_METHOD_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates an optional customer email.
///
/// ## Rules
/// - Blank is treated as absent
/// - At most 255 characters
/// - One `@` with a non-empty local part and a domain containing a dot
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_customer_email;
///
/// assert!(validate_customer_email(Some("ana@shop.example")).is_ok());
/// assert!(validate_customer_email(None).is_ok());
/// assert!(validate_customer_email(Some("not-an-email")).is_err());
/// ```
pub fn validate_customer_email(email: Option<&str>) -> ValidationResult<()> {
    let email = match email.map(str::trim) {
        Some(e) if !e.is_empty() => e,
        _ => return Ok(()),
    };

    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "customer_email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity (must be > 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price (must be >= 0; zero is allowed for free items).
///
/// ## Example
/// ```rust
/// use backoffice_core::money::Price;
/// use backoffice_core::validation::validate_price;
///
/// assert!(validate_price("price", Price::from_cents(1099)).is_ok());
/// assert!(validate_price("price", Price::default()).is_ok());
/// assert!(validate_price("price", Price::from_cents(-100)).is_err());
/// ```
pub fn validate_price(field: &str, price: Price) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock count or threshold (must be >= 0).
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a category before insert.
pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)
}

/// Validates a product before insert.
///
/// The category reference is checked against the store by the repository.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price("price", product.price)
}

/// Validates a stock update before it is written.
pub fn validate_stock_update(update: &StockUpdate) -> ValidationResult<()> {
    validate_stock_level("quantity", update.quantity)?;
    if let Some(threshold) = update.low_stock_threshold {
        validate_stock_level("low_stock_threshold", threshold)?;
    }
    Ok(())
}

/// Validates a sale before it is priced and recorded.
///
/// ## Rules
/// ```text
/// items.is_empty()          → CoreError::EmptySale
/// item.quantity <= 0        → ValidationError::MustBePositive
/// item.unit_price < 0       → ValidationError::OutOfRange
/// payment_method too long   → ValidationError::TooLong
/// malformed customer_email  → ValidationError::InvalidFormat
/// ```
pub fn validate_new_sale(sale: &NewSale) -> CoreResult<()> {
    if sale.items.is_empty() {
        return Err(CoreError::EmptySale);
    }

    for item in &sale.items {
        validate_quantity(item.quantity)?;
        validate_price("unit_price", item.unit_price)?;
    }

    validate_payment_method(sale.payment_method.as_deref())?;
    validate_customer_email(sale.customer_email.as_deref())?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewSaleItem;

    fn sale_with(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            payment_method: Some("cash".to_string()),
            customer_email: None,
            items,
        }
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_category_name("Books").is_ok());
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name(&"A".repeat(101)).is_err());

        assert!(validate_product_name(&"A".repeat(255)).is_ok());
        assert!(validate_product_name(&"A".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_customer_email() {
        assert!(validate_customer_email(Some("a@b.co")).is_ok());
        assert!(validate_customer_email(Some("   ")).is_ok());
        assert!(validate_customer_email(Some("@b.co")).is_err());
        assert!(validate_customer_email(Some("a@b")).is_err());
        assert!(validate_customer_email(Some("a@@b.co")).is_err());
        assert!(validate_customer_email(Some("a@.co")).is_err());
    }

    #[test]
    fn test_validate_payment_method() {
        assert!(validate_payment_method(Some("card")).is_ok());
        assert!(validate_payment_method(None).is_ok());
        assert!(validate_payment_method(Some(&"x".repeat(51))).is_err());
    }

    #[test]
    fn test_validate_new_sale() {
        let ok = sale_with(vec![NewSaleItem {
            product_id: 1,
            quantity: 2,
            unit_price: Price::default(),
        }]);
        assert!(validate_new_sale(&ok).is_ok());

        assert!(matches!(validate_new_sale(&sale_with(vec![])), Err(CoreError::EmptySale)));

        let zero_qty = sale_with(vec![NewSaleItem {
            product_id: 1,
            quantity: 0,
            unit_price: Price::from_cents(100),
        }]);
        assert!(matches!(
            validate_new_sale(&zero_qty),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let negative_price = sale_with(vec![NewSaleItem {
            product_id: 1,
            quantity: 1,
            unit_price: Price::from_cents(-1),
        }]);
        assert!(matches!(
            validate_new_sale(&negative_price),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_validate_stock_update() {
        assert!(validate_stock_update(&StockUpdate {
            quantity: 0,
            low_stock_threshold: Some(0),
        })
        .is_ok());
        assert!(validate_stock_update(&StockUpdate {
            quantity: -1,
            low_stock_threshold: None,
        })
        .is_err());
        assert!(validate_stock_update(&StockUpdate {
            quantity: 1,
            low_stock_threshold: Some(-5),
        })
        .is_err());
    }
}
