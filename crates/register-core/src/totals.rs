//! # Totals
//!
//! Turns a cart into the three amounts shown on the confirmation screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [{PRICE:1000, qty:2}, {PRICE:500, qty:1}]                              │
//! │        │                                                                │
//! │        ▼  Σ PRICE × qty                                                 │
//! │  subtotal = 2500                                                        │
//! │        │                                                                │
//! │        ▼  round_half_up(subtotal × 10%)                                 │
//! │  tax      = 250                                                         │
//! │        │                                                                │
//! │        ▼  subtotal + tax                                                │
//! │  total    = 2750                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is computed once on the subtotal, not per line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, TaxRate};
use crate::types::CartLine;

/// Subtotal, tax and total of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl Totals {
    /// Builds totals from a subtotal and its tax; `total` is always their sum.
    pub fn from_parts(subtotal: Money, tax: Money) -> Self {
        Totals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Totals of an empty cart.
    pub fn zero() -> Self {
        Totals::from_parts(Money::zero(), Money::zero())
    }
}

/// Computes totals at the standard 10% rate.
///
/// ## Example
/// ```rust
/// use register_core::{compute_totals, CartLine, Money};
///
/// let totals = compute_totals(&[CartLine::new(Money::from_yen(1000), 1)]);
/// assert_eq!(totals.total.yen(), 1100);
/// ```
pub fn compute_totals(cart: &[CartLine]) -> Totals {
    compute_totals_with_rate(cart, TaxRate::standard())
}

/// Computes totals at an explicit rate.
pub fn compute_totals_with_rate(cart: &[CartLine], rate: TaxRate) -> Totals {
    let subtotal: Money = cart.iter().map(CartLine::line_total).sum();
    Totals::from_parts(subtotal, subtotal.calculate_tax(rate))
}
