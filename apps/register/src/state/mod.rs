//! # State Module
//!
//! Long-lived state shared between screens.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐   │
//! │  │        CartState         │        │        RegisterConfig        │   │
//! │  │                          │        │                              │   │
//! │  │  Arc<RwLock<Cart>>       │        │  [api]     endpoint, timeout │   │
//! │  │  snapshot / replace /    │        │  [store]   locale, tax rate  │   │
//! │  │  clear                   │        │  [scanner] constraints       │   │
//! │  └──────────────────────────┘        └──────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • CartState: RwLock, locks never held across an await                  │
//! │  • RegisterConfig: read-only after load                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::{Cart, CartReader, CartState};
pub use config::{
    ConfigError, ConfigResult, RegisterConfig, ScannerSettings, StoreSettings, CONFIG_FILE_NAME,
};
