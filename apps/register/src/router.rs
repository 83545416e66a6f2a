//! # Router
//!
//! Screen routes and the navigator seam.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Routes                                               │
//! │                                                                         │
//! │  Route::Home                 /                                          │
//! │  Route::Scan                 /scan                                      │
//! │  Route::Cart                 /cart                                      │
//! │  Route::Confirm              /confirm                                   │
//! │  Route::Product { code }     /product?code=4901234567894                │
//! │  Route::Complete { .. }      /complete   (+ CompletedPurchase handoff)  │
//! │                                                                         │
//! │  navigate(route).await returns once the route is committed. Callers     │
//! │  that must act "after navigation" (clearing the cart) simply await it.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use register_core::{CompletedPurchase, JanCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// A screen the register can show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Route {
    Home,
    Scan,
    Cart,
    Confirm,
    Product { code: JanCode },
    Complete { purchase: CompletedPurchase },
}

impl Route {
    /// URL path (and query) of the route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Scan => "/scan".to_string(),
            Route::Cart => "/cart".to_string(),
            Route::Confirm => "/confirm".to_string(),
            Route::Product { code } => format!("/product?code={}", code),
            Route::Complete { .. } => "/complete".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Why a path did not parse into a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    Unknown(String),

    #[error("Product route needs a 13-digit code: {0}")]
    BadProductCode(String),

    /// `/complete` is only reachable with a purchase handoff.
    #[error("/complete cannot be opened without a completed purchase")]
    MissingHandoff,
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s, None),
        };

        match path.trim_end_matches('/') {
            "" => Ok(Route::Home),
            "/scan" => Ok(Route::Scan),
            "/cart" => Ok(Route::Cart),
            "/confirm" => Ok(Route::Confirm),
            "/complete" => Err(RouteError::MissingHandoff),
            "/product" => {
                let code = query
                    .into_iter()
                    .flat_map(|q| q.split('&'))
                    .find_map(|pair| pair.strip_prefix("code="))
                    .unwrap_or_default();
                JanCode::parse(code)
                    .map(|code| Route::Product { code })
                    .map_err(|_| RouteError::BadProductCode(code.to_string()))
            }
            _ => Err(RouteError::Unknown(s.to_string())),
        }
    }
}

/// Moves the app to another screen.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Resolves once the new route is committed.
    async fn navigate(&self, route: Route);
}

/// Navigator that commits immediately and keeps the history.
///
/// The terminal front-end reads the history to report where a screen sent
/// the cashier.
#[derive(Debug, Default)]
pub struct RouteLog {
    history: Mutex<Vec<Route>>,
}

impl RouteLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every committed route, oldest first.
    pub fn routes(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Navigator for RouteLog {
    async fn navigate(&self, route: Route) {
        info!(path = %route.path(), "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
