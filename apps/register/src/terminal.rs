//! # Terminal Front-End
//!
//! Drives the screen controllers from a terminal.
//!
//! ```text
//! register scan                    register checkout --cart cart.json
//! ─────────────                    ──────────────────────────────────
//! ScanScreen + TerminalCamera      ConfirmScreen + HttpPurchaseGateway
//!   stdin line ──► decode event      prints lines and the total
//!   Ctrl-C     ──► close()           "OK? [y/N]" ──► submit() / cancel()
//!   prints the route it ended on     prints the route it ended on
//! ```

use std::path::Path;
use std::sync::Arc;

use register_api::HttpPurchaseGateway;
use register_core::CartLine;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::camera::terminal::TerminalCamera;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::messages::{text, Message};
use crate::notice::TerminalNotifier;
use crate::router::RouteLog;
use crate::screens::{ConfirmScreen, ScanPhase, ScanScreen, ScanView, SubmitOutcome};
use crate::state::{Cart, CartReader, CartState, RegisterConfig};

/// `register scan`: read JAN codes from a keyboard-wedge scanner.
pub async fn run_scan(config: &RegisterConfig) -> AppResult<()> {
    let locale = config.store.locale;
    let navigator = Arc::new(RouteLog::new());
    let scanner = ScanScreen::with_settings(
        Arc::new(TerminalCamera::stdin()),
        navigator.clone(),
        &config.scanner,
    )
    .with_locale(locale)
    .mount();
    let handle = scanner.handle().clone();

    println!("{}", text(locale, Message::AppTitle(&config.store.name)));
    print_scan_view(&handle.view());

    let phase = tokio::select! {
        phase = handle.wait_for(|p| p.is_final() || matches!(p, ScanPhase::Failed(_))) => phase,
        _ = tokio::signal::ctrl_c() => {
            debug!("Interrupted; closing scanner");
            handle.close().await;
            handle.wait_for(ScanPhase::is_final).await
        }
    };

    if let ScanPhase::Failed(err) = &phase {
        print_scan_view(&ScanView::render(&phase, locale));
        scanner.unmount().await;
        return Err(err.clone().into());
    }

    scanner.unmount().await;
    if let Some(route) = navigator.last() {
        println!("{}", route.path());
    }
    Ok(())
}

fn print_scan_view(view: &ScanView) {
    println!("== {} ==", view.title);
    if let Some(status) = &view.status {
        println!("{}", status);
    }
    if let Some(error) = &view.error {
        eprintln!("{}", error);
    }
}

/// Reads a cart JSON file (an array of `{PRICE, qty, ...}` lines).
pub fn load_cart(path: &Path) -> AppResult<Cart> {
    let contents = std::fs::read_to_string(path)?;
    let lines: Vec<CartLine> = serde_json::from_str(&contents)?;
    Ok(Cart::from_lines(lines)?)
}

/// `register checkout`: confirm and submit a cart.
pub async fn run_checkout(config: &RegisterConfig, cart_path: &Path, assume_yes: bool) -> AppResult<()> {
    let locale = config.store.locale;
    let cart = CartState::with_cart_value(load_cart(cart_path)?);
    info!(lines = cart.reader().item_count(), "Cart loaded");

    let gateway = Arc::new(HttpPurchaseGateway::new(&config.api)?);
    let navigator = Arc::new(RouteLog::new());
    let screen = ConfirmScreen::new(
        cart.clone(),
        gateway,
        navigator.clone(),
        Arc::new(TerminalNotifier),
    )
    .with_tax_rate(config.store.tax_rate())
    .with_locale(locale);

    println!("{}", text(locale, Message::AppTitle(&config.store.name)));
    println!("== {} ==", text(locale, Message::ConfirmTitle));
    print_cart(&cart.reader());
    let view = screen.view();
    println!("{}: {}", text(locale, Message::TotalLabel), view.display_total);

    let confirmed = assume_yes || prompt_yes(&view.submit_label, &view.cancel_label).await?;
    if !confirmed {
        screen.cancel().await;
        print_last_route(&navigator);
        return Ok(());
    }

    println!("{}", text(locale, Message::Processing));
    match screen.submit().await {
        SubmitOutcome::Completed(purchase) => {
            print_last_route(&navigator);
            println!("{}", purchase.totals.total);
            Ok(())
        }
        SubmitOutcome::Failed(err) => Err(err),
        SubmitOutcome::Ignored => Err(AppError::new(
            ErrorCode::Internal,
            "purchase already submitted",
        )),
    }
}

fn print_cart(cart: &CartReader) {
    cart.with_cart(|cart| {
        for line in cart.lines() {
            let name = line.field_str("NAME").unwrap_or("-");
            println!("  {} x{}  {}", name, line.qty, line.line_total());
        }
    });
}

fn print_last_route(navigator: &RouteLog) {
    if let Some(route) = navigator.last() {
        println!("{}", route.path());
    }
}

async fn prompt_yes(ok: &str, cancel: &str) -> AppResult<bool> {
    println!("[y] {}  [n] {}", ok, cancel);
    let mut input = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut input)
        .await?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes"))
}
