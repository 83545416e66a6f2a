//! # Screens
//!
//! Headless controllers for the two screens with real behaviour. A
//! rendering layer (web view or terminal) owns one controller per mounted
//! screen, renders its `view()` and forwards button presses.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /scan     ScanScreen::mount() ──► MountedScanner                       │
//! │              handle: close(), retry(), wait_for(), view()               │
//! │              unmount()                                                  │
//! │                                                                         │
//! │  /confirm  ConfirmScreen                                                │
//! │              submit(), cancel(), view()                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod confirm;
pub mod scan;

pub use confirm::{ConfirmPhase, ConfirmScreen, ConfirmView, SubmitOutcome};
pub use scan::{MountedScanner, ScanHandle, ScanLatch, ScanPhase, ScanScreen, ScanView};
