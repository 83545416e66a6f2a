//! # Cart State
//!
//! The cart shared by every screen of the register.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Access                                    │
//! │                                                                         │
//! │  Screen / Caller          Access               Operation                │
//! │  ───────────────          ──────               ─────────                │
//! │                                                                         │
//! │  Product / cart file ───► CartState ─────────► replace()                │
//! │                                                                         │
//! │  Confirm screen ────────► CartState ─────────► snapshot(), clear()      │
//! │                                                                         │
//! │  Renderers ─────────────► CartReader ────────► with_cart() (read only)  │
//! │                                                                         │
//! │  NOTE: Closures passed to with_cart / with_cart_mut run under the lock. │
//! │        Never await inside them.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use register_core::validation::validate_cart;
use register_core::{
    compute_totals_with_rate, CartLine, CoreError, CoreResult, TaxRate, Totals, MAX_CART_LINES,
};
use serde::{Deserialize, Serialize};

/// The cart: an ordered list of lines.
///
/// ## Invariants
/// - Maximum lines: 100 (`MAX_CART_LINES` in register-core)
/// - Quantity per line: 1..=999 (`MAX_LINE_QUANTITY` in register-core)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Builds a cart from existing lines after validating them.
    pub fn from_lines(lines: Vec<CartLine>) -> CoreResult<Self> {
        validate_cart(&lines)?;
        Ok(Cart { lines })
    }

    /// Replaces every line at once. On error the cart is left untouched.
    pub fn replace(&mut self, lines: Vec<CartLine>) -> CoreResult<()> {
        if lines.len() > MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        validate_cart(&lines)?;
        self.lines = lines;
        Ok(())
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Live totals at `rate`.
    pub fn totals(&self, rate: TaxRate) -> Totals {
        compute_totals_with_rate(&self.lines, rate)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Shared, mutable cart store.
///
/// ## Thread Safety
/// `Arc<RwLock<Cart>>`: the confirmation screen renders the live total on
/// every view while other callers mutate the cart, so reads must not block
/// each other. A poisoned lock is recovered; the cart holds no invariant a
/// panicking reader could break.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<RwLock<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart state holding `cart`.
    pub fn with_cart_value(cart: Cart) -> Self {
        CartState {
            cart: Arc::new(RwLock::new(cart)),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use register_app::state::CartState;
    ///
    /// let cart_state = CartState::new();
    /// assert!(cart_state.with_cart(|cart| cart.is_empty()));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.read().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Copy of the lines as they are right now.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.with_cart(|cart| cart.lines().to_vec())
    }

    /// Replace-all mutator.
    pub fn replace(&self, lines: Vec<CartLine>) -> CoreResult<()> {
        self.with_cart_mut(|cart| cart.replace(lines))
    }

    /// Empties the cart.
    pub fn clear(&self) {
        self.with_cart_mut(Cart::clear);
    }

    /// A read-only view onto the same cart.
    pub fn reader(&self) -> CartReader {
        CartReader {
            cart: Arc::clone(&self.cart),
        }
    }
}

/// Read-only handle to the cart store.
#[derive(Debug, Clone)]
pub struct CartReader {
    cart: Arc<RwLock<Cart>>,
}

impl CartReader {
    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.read().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Number of lines right now.
    pub fn item_count(&self) -> usize {
        self.with_cart(Cart::item_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_core::{Money, MAX_LINE_QUANTITY};

    fn line(price: i64, qty: i64) -> CartLine {
        CartLine::new(Money::from_yen(price), qty)
    }

    #[test]
    fn test_cart_replace_and_totals() {
        let mut cart = Cart::new();
        cart.replace(vec![line(1000, 2), line(500, 1)]).unwrap();

        assert_eq!(cart.item_count(), 2);

        let totals = cart.totals(TaxRate::standard());
        assert_eq!(totals.subtotal.yen(), 2500);
        assert_eq!(totals.tax.yen(), 250);
        assert_eq!(totals.total.yen(), 2750);
    }

    #[test]
    fn test_cart_replace_rejects_bad_lines() {
        let mut cart = Cart::from_lines(vec![line(300, 1)]).unwrap();

        assert!(cart.replace(vec![line(100, 0)]).is_err());
        assert!(cart.replace(vec![line(100, MAX_LINE_QUANTITY + 1)]).is_err());
        assert!(cart.replace(vec![line(-1, 1)]).is_err());

        // Rejected replacements leave the previous lines in place
        assert_eq!(cart.lines(), &[line(300, 1)]);
    }

    #[test]
    fn test_cart_max_lines() {
        let mut cart = Cart::new();
        cart.replace(vec![line(100, 1); MAX_CART_LINES]).unwrap();
        assert!(matches!(
            cart.replace(vec![line(100, 1); MAX_CART_LINES + 1]),
            Err(CoreError::CartTooLarge { max: MAX_CART_LINES })
        ));
        assert_eq!(cart.item_count(), MAX_CART_LINES);
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::from_lines(vec![line(999, 2)]).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals(TaxRate::standard()), Totals::zero());
    }

    #[test]
    fn test_cart_json_is_a_plain_array() {
        let cart: Cart =
            serde_json::from_str(r#"[{"PRICE": 1000, "qty": 2, "NAME": "Tote"}]"#).unwrap();
        assert_eq!(cart.lines()[0].field_str("NAME"), Some("Tote"));
        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            serde_json::json!([{"PRICE": 1000, "qty": 2, "NAME": "Tote"}])
        );
    }

    #[test]
    fn test_state_snapshot_is_detached() {
        let state = CartState::new();
        state.replace(vec![line(1000, 1)]).unwrap();

        let snapshot = state.snapshot();
        state.clear();

        assert_eq!(snapshot.len(), 1);
        assert!(state.with_cart(Cart::is_empty));
    }

    #[test]
    fn test_reader_sees_writes() {
        let state = CartState::new();
        let reader = state.reader();

        state.replace(vec![line(500, 1)]).unwrap();
        assert_eq!(reader.item_count(), 1);

        state.clear();
        assert_eq!(reader.item_count(), 0);
    }
}
