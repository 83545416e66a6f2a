//! # Domain Types
//!
//! Data the two screens exchange with the cart store, the purchase
//! endpoint and each other.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    CartLine     │   │ PurchaseRequest │   │  CompletedPurchase  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  PRICE (yen)    │──►│  items          │   │  totals (frozen)    │   │
//! │  │  qty            │   │  subtotal       │   │  completed_at       │   │
//! │  │  ...display     │   │  total          │   │                     │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  POST /purchase body ◄── PurchaseRequest                                │
//! │  /complete route     ◄── CompletedPurchase                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::money::Money;
use crate::totals::Totals;

// =============================================================================
// Cart Line
// =============================================================================

/// One line of the shared cart.
///
/// ## Wire Shape
/// The cart is filled from product lookups whose display fields the
/// register never interprets. Only `PRICE` and `qty` take part in totals;
/// everything else is kept in `fields` and written back untouched when the
/// cart is posted to `/purchase`.
///
/// ```json
/// { "PRICE": 1000, "qty": 2, "NAME": "トートバッグ", "CODE": "4901234567894" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Unit price in yen.
    #[serde(rename = "PRICE")]
    pub price: Money,

    /// Quantity in cart.
    pub qty: i64,

    /// Display fields carried through verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CartLine {
    /// Creates a line with no display fields.
    pub fn new(price: Money, qty: i64) -> Self {
        CartLine {
            price,
            qty,
            fields: Map::new(),
        }
    }

    /// Adds a display field (builder style).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns a display field as a string, if present and textual.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Line total before tax (PRICE × qty).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

// =============================================================================
// Purchase Request
// =============================================================================

/// Body of `POST <API base>/purchase`.
///
/// Built from the cart snapshot taken when the cashier pressed OK, together
/// with the totals computed from that same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    pub total: Money,
}

impl PurchaseRequest {
    /// Pairs a cart snapshot with the totals computed from it.
    pub fn from_snapshot(items: Vec<CartLine>, totals: &Totals) -> Self {
        PurchaseRequest {
            items,
            subtotal: totals.subtotal,
            total: totals.total,
        }
    }
}

// =============================================================================
// Completed Purchase
// =============================================================================

/// Handoff value for the completion screen.
///
/// The cart is cleared right after navigating to `/complete`, so the
/// completion screen reads the amount from here instead of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompletedPurchase {
    /// Totals frozen when the purchase was submitted.
    pub totals: Totals,

    /// When the endpoint accepted the purchase.
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

impl CompletedPurchase {
    /// Stamps frozen totals with the current time.
    pub fn now(totals: Totals) -> Self {
        CompletedPurchase {
            totals,
            completed_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_line_reads_upper_case_price() {
        let line: CartLine =
            serde_json::from_value(json!({ "PRICE": 1000, "qty": 2, "NAME": "Tote" })).unwrap();

        assert_eq!(line.price, Money::from_yen(1000));
        assert_eq!(line.qty, 2);
        assert_eq!(line.field_str("NAME"), Some("Tote"));
        assert_eq!(line.line_total().yen(), 2000);
    }

    #[test]
    fn test_cart_line_keeps_display_fields_on_the_wire() {
        let original = json!({ "PRICE": 500, "qty": 1, "NAME": "Sticker", "CODE": "4901234567894" });
        let line: CartLine = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(serde_json::to_value(&line).unwrap(), original);
    }

    #[test]
    fn test_purchase_request_body_shape() {
        let items = vec![CartLine::new(Money::from_yen(1000), 2)];
        let totals = Totals::from_parts(Money::from_yen(2000), Money::from_yen(200));
        let request = PurchaseRequest::from_snapshot(items, &totals);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "items": [{ "PRICE": 1000, "qty": 2 }],
                "subtotal": 2000,
                "total": 2200
            })
        );
    }

    #[test]
    fn test_completed_purchase_carries_totals() {
        let totals = Totals::from_parts(Money::from_yen(2500), Money::from_yen(250));
        let done = CompletedPurchase::now(totals);
        assert_eq!(done.totals.total.yen(), 2750);
    }
}
