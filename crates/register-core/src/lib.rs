//! # register-core: Pure Business Logic for the POP-UP STORE Register
//!
//! This crate holds every rule the register applies to money and barcodes,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     POP-UP STORE Register                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Screens (apps/register)                         │   │
//! │  │        ScanScreen ──► /product ... /cart ──► ConfirmScreen      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ register-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │    jan    │  │   │
//! │  │   │ CartLine  │  │   Money   │  │  Totals   │  │  JanCode  │  │   │
//! │  │   │ Purchase  │  │  TaxRate  │  │ compute_* │  │ predicate │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart lines, purchase request, completion handoff
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Subtotal / tax / total computation
//! - [`jan`] - The 13-digit JAN code predicate and newtype
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use register_core::{compute_totals, CartLine, Money};
//!
//! let cart = vec![
//!     CartLine::new(Money::from_yen(1000), 2),
//!     CartLine::new(Money::from_yen(500), 1),
//! ];
//!
//! let totals = compute_totals(&cart);
//! assert_eq!(totals.subtotal.yen(), 2500);
//! assert_eq!(totals.tax.yen(), 250);
//! assert_eq!(totals.total.yen(), 2750);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod jan;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use jan::{is_jan_code, JanCode};
pub use money::{Money, TaxRate};
pub use totals::{compute_totals, compute_totals_with_rate, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Consumption tax applied at the register: 10% expressed in basis points.
pub const STANDARD_TAX_RATE_BPS: u32 = 1000;

/// Number of digits in a JAN (EAN-13) product code.
pub const JAN_CODE_LEN: usize = 13;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Highest unit price the register accepts, in yen.
///
/// With `MAX_LINE_QUANTITY` and `MAX_CART_LINES` this keeps every total well
/// inside `i64`.
pub const MAX_UNIT_PRICE: i64 = 100_000_000;

/// Maximum quantity of a single line.
///
/// Guards against typing 1000 instead of 10 on the cart screen.
pub const MAX_LINE_QUANTITY: i64 = 999;
