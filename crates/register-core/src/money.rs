//! # Money Module
//!
//! Provides the `Money` type for handling yen amounts safely, and the
//! `TaxRate` it is taxed with.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    2500 × 0.1 = 250.00000000000003   ❌ needs rounding anyway           │
//! │                                                                         │
//! │  OUR SOLUTION: integer yen + basis points                               │
//! │    (2500 × 1000 + 5000) / 10000 = 250  ✅ exact, rounded half up        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use register_core::money::{Money, TaxRate};
//!
//! let price = Money::from_yen(1099);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.yen(), 2198);
//!
//! let tax = line.calculate_tax(TaxRate::from_bps(1000));
//! assert_eq!(tax.yen(), 220);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole yen.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds
/// - **Single field tuple struct**: serializes as a bare JSON number, which
///   is what the purchase endpoint expects for `subtotal` and `total`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole yen.
    #[inline]
    pub const fn from_yen(yen: i64) -> Self {
        Money(yen)
    }

    /// Returns the amount in yen.
    #[inline]
    pub const fn yen(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 is the half-unit that makes 0.5 round up.
    ///
    /// ```text
    /// Subtotal: 2505円
    ///      │
    ///      ▼
    /// calculate_tax(10%) ← THIS FUNCTION
    ///      │   2505 × 1000 = 2_505_000
    ///      │   + 5000      = 2_510_000
    ///      │   / 10000     = 251
    ///      ▼
    /// Tax: 251円 (250.5 rounded up)
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use register_core::money::{Money, TaxRate};
    ///
    /// let tax = Money::from_yen(2505).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.yen(), 251);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps the intermediate product from overflowing
        let scaled = self.0 as i128 * rate.bps() as i128;
        let half = if scaled < 0 { -5000 } else { 5000 };
        Money::from_yen(((scaled + half) / 10000) as i64)
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64`
    /// bounds. Validated carts never get near them.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Renders the amount the way the register displays it: `2750円`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}円", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10% (the standard
/// consumption tax) and 800 bps = 8% (the reduced rate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// The 10% standard rate.
    #[inline]
    pub const fn standard() -> Self {
        TaxRate(crate::STANDARD_TAX_RATE_BPS)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_yen(2750).to_string(), "2750円");
        assert_eq!(Money::zero().to_string(), "0円");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_yen(1000);
        let b = Money::from_yen(500);

        assert_eq!((a + b).yen(), 1500);
        assert_eq!((a - b).yen(), 500);
        assert_eq!((a * 3).yen(), 3000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_yen(100_000_000_000_000_000);
        assert_eq!(huge.multiply_quantity(999).yen(), i64::MAX);
        assert_eq!((huge * 999 + huge).yen(), i64::MAX);
        assert_eq!((Money::from_yen(i64::MIN) - Money::from_yen(1)).yen(), i64::MIN);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].into_iter().map(Money::from_yen).sum();
        assert_eq!(total.yen(), 600);
    }

    #[test]
    fn test_tax_exact() {
        let tax = Money::from_yen(2500).calculate_tax(TaxRate::standard());
        assert_eq!(tax.yen(), 250);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 250.5 → 251
        assert_eq!(Money::from_yen(2505).calculate_tax(TaxRate::standard()).yen(), 251);
        // 250.4 → 250
        assert_eq!(Money::from_yen(2504).calculate_tax(TaxRate::standard()).yen(), 250);
        // 0.5 → 1
        assert_eq!(Money::from_yen(5).calculate_tax(TaxRate::standard()).yen(), 1);
    }

    #[test]
    fn test_tax_reduced_rate() {
        let tax = Money::from_yen(1080).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.yen(), 86); // 86.4
    }

    #[test]
    fn test_tax_rate_percentage() {
        assert!((TaxRate::standard().percentage() - 10.0).abs() < f64::EPSILON);
        assert_eq!(TaxRate::default(), TaxRate::from_bps(1000));
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_yen(2750)).unwrap();
        assert_eq!(json, "2750");
    }
}
