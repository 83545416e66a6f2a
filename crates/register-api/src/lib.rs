//! # register-api: Purchase Endpoint Client
//!
//! The only network I/O the register performs.
//!
//! ## Modules
//! - [`client`] - `PurchaseGateway` trait and the reqwest implementation
//! - [`config`] - `ApiConfig` (base URL, timeout)
//! - [`error`] - `ApiError`
//!
//! ## Usage
//! ```rust,no_run
//! use register_api::{ApiConfig, HttpPurchaseGateway, PurchaseGateway};
//! use register_core::{compute_totals, CartLine, Money, PurchaseRequest};
//!
//! # async fn demo() -> register_api::ApiResult<()> {
//! let gateway = HttpPurchaseGateway::new(&ApiConfig::with_endpoint("http://localhost:8000"))?;
//!
//! let items = vec![CartLine::new(Money::from_yen(1000), 1)];
//! let totals = compute_totals(&items);
//! gateway.submit(&PurchaseRequest::from_snapshot(items, &totals)).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{HttpPurchaseGateway, PurchaseGateway};
pub use config::{ApiConfig, PURCHASE_PATH};
pub use error::{ApiError, ApiResult};
