//! # Validation Module
//!
//! Input validation for cart contents arriving from outside the register
//! (the product lookup, a cart file handed to the terminal front-end).
//!
//! ## Usage
//! ```rust
//! use register_core::validation::{validate_price, validate_quantity};
//! use register_core::Money;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_price(Money::from_yen(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::CartLine;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_UNIT_PRICE (100,000,000 yen)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.yen() > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "PRICE".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates the number of lines a cart may grow to.
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

/// Validates a whole cart: size, then every line's price and quantity.
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    validate_cart_size(lines.len())?;
    for line in lines {
        validate_price(line.price)?;
        validate_quantity(line.qty)?;
    }
    Ok(())
}
