//! # Confirmation Screen
//!
//! Shows the amount due and submits the purchase.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Confirm Phases                                       │
//! │                                                                         │
//! │            submit()                     Ok(())                          │
//! │   ┌──────┐ ─────────► ┌────────────┐ ─────────────► ┌───────────┐       │
//! │   │ Idle │            │ Submitting │                │ Navigated │       │
//! │   └──────┘ ◄───────── └────────────┘                └───────────┘       │
//! │      │       Err(_)         │                             │             │
//! │      │    notice + rollback │ total frozen                │ total stays │
//! │      │                      │ buttons disabled            │ frozen      │
//! │   cancel() ──► /cart                                      │             │
//! │                                       navigate(/complete).await         │
//! │                                       then cart.clear()                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The screen state sits behind a `std::sync::Mutex` that is released before
//! every await. A second `submit()` while one is in flight sees `Submitting`
//! and returns [`SubmitOutcome::Ignored`] without touching anything.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use register_api::PurchaseGateway;
use register_core::{
    compute_totals_with_rate, CompletedPurchase, Money, PurchaseRequest, TaxRate, Totals,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::messages::{text, Locale, Message};
use crate::notice::Notifier;
use crate::router::{Navigator, Route};
use crate::state::CartState;

/// Where the screen is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfirmPhase {
    Idle,
    Submitting,
    /// Terminal: the purchase succeeded and the app left the screen.
    Navigated,
}

/// Render snapshot of the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmView {
    pub phase: ConfirmPhase,
    /// Frozen total while submitting or after success; live total otherwise.
    pub display_total: Money,
    pub submit_enabled: bool,
    pub cancel_enabled: bool,
    pub submit_label: String,
    pub cancel_label: String,
}

/// Result of pressing OK.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The endpoint accepted the purchase; the cart has been cleared.
    Completed(CompletedPurchase),
    /// The call failed; the screen is back to `Idle`.
    Failed(AppError),
    /// A submission was already in flight (or finished); nothing happened.
    Ignored,
}

#[derive(Debug)]
struct ConfirmState {
    phase: ConfirmPhase,
    frozen: Option<Totals>,
}

/// Confirmation screen controller.
pub struct ConfirmScreen {
    cart: CartState,
    gateway: Arc<dyn PurchaseGateway>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    tax_rate: TaxRate,
    locale: Locale,
    state: Mutex<ConfirmState>,
}

impl ConfirmScreen {
    pub fn new(
        cart: CartState,
        gateway: Arc<dyn PurchaseGateway>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        ConfirmScreen {
            cart,
            gateway,
            navigator,
            notifier,
            tax_rate: TaxRate::standard(),
            locale: Locale::default(),
            state: Mutex::new(ConfirmState {
                phase: ConfirmPhase::Idle,
                frozen: None,
            }),
        }
    }

    pub fn with_tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ConfirmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> ConfirmPhase {
        self.lock().phase
    }

    /// Live totals of the cart as it is now.
    pub fn live_totals(&self) -> Totals {
        self.cart.with_cart(|cart| cart.totals(self.tax_rate))
    }

    /// What the screen should show right now.
    pub fn view(&self) -> ConfirmView {
        let (phase, frozen) = {
            let state = self.lock();
            (state.phase, state.frozen)
        };
        let display_total = match frozen {
            Some(totals) => totals.total,
            None => self.live_totals().total,
        };
        let idle = phase == ConfirmPhase::Idle;
        let submit_label = match phase {
            ConfirmPhase::Submitting => Message::Processing,
            _ => Message::SubmitButton,
        };

        ConfirmView {
            phase,
            display_total,
            submit_enabled: idle,
            cancel_enabled: idle,
            submit_label: text(self.locale, submit_label),
            cancel_label: text(self.locale, Message::CancelButton),
        }
    }

    /// OK pressed.
    pub async fn submit(&self) -> SubmitOutcome {
        let (request, totals) = {
            let mut state = self.lock();
            if state.phase != ConfirmPhase::Idle {
                debug!(phase = ?state.phase, "Submit ignored");
                return SubmitOutcome::Ignored;
            }

            let items = self.cart.snapshot();
            let totals = compute_totals_with_rate(&items, self.tax_rate);
            state.phase = ConfirmPhase::Submitting;
            state.frozen = Some(totals);
            (PurchaseRequest::from_snapshot(items, &totals), totals)
        };

        info!(
            items = request.items.len(),
            total = %totals.total,
            "Submitting purchase"
        );

        match self.gateway.submit(&request).await {
            Ok(()) => {
                self.lock().phase = ConfirmPhase::Navigated;

                let purchase = CompletedPurchase::now(totals);
                self.navigator
                    .navigate(Route::Complete {
                        purchase: purchase.clone(),
                    })
                    .await;

                // The completion screen reads the handoff, never the cart
                self.cart.clear();
                info!(total = %totals.total, "Purchase completed, cart cleared");
                SubmitOutcome::Completed(purchase)
            }
            Err(err) => {
                warn!(error = %err, "Purchase failed, rolling back");
                self.notifier
                    .alert(&text(self.locale, Message::PurchaseFailed));

                let mut state = self.lock();
                state.phase = ConfirmPhase::Idle;
                state.frozen = None;
                SubmitOutcome::Failed(err.into())
            }
        }
    }

    /// Cancel pressed. Returns false when cancel is disabled.
    pub async fn cancel(&self) -> bool {
        if self.phase() != ConfirmPhase::Idle {
            debug!("Cancel ignored while not idle");
            return false;
        }
        self.navigator.navigate(Route::Cart).await;
        true
    }
}
