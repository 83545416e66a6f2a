//! # Register App Library
//!
//! Screen controllers and runtime wiring for the POP-UP STORE register.
//!
//! ## Module Organization
//! ```text
//! register_app/
//! ├── lib.rs          ◄─── You are here (CLI, logging, run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Shared cart store
//! │   └── config.rs   ◄─── RegisterConfig (file + env)
//! ├── screens/
//! │   ├── confirm.rs  ◄─── Purchase confirmation controller
//! │   └── scan.rs     ◄─── Barcode scanner controller
//! ├── camera/
//! │   ├── mod.rs      ◄─── CameraBackend seam, events, constraints
//! │   ├── error.rs    ◄─── CameraError + platform name mapping
//! │   ├── session.rs  ◄─── Stream/decoder ownership
//! │   └── terminal.rs ◄─── Keyboard-wedge backend
//! ├── router.rs       ◄─── Route, Navigator
//! ├── notice.rs       ◄─── Blocking notices
//! ├── messages.rs     ◄─── Japanese / English strings
//! ├── terminal.rs     ◄─── Terminal front-end
//! └── error.rs        ◄─── AppError for the rendering layer
//! ```

pub mod camera;
pub mod error;
pub mod messages;
pub mod notice;
pub mod router;
pub mod screens;
pub mod state;
pub mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::AppResult;
use state::RegisterConfig;

/// POP-UP STORE register.
#[derive(Debug, Parser)]
#[command(name = "register", version, about)]
pub struct Cli {
    /// Config file (default: platform config dir / register.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a JAN code with a keyboard-wedge scanner on stdin
    Scan,

    /// Confirm and submit a cart
    Checkout {
        /// Cart JSON: [{"PRICE": 1000, "qty": 2, ...}, ...]
        #[arg(long)]
        cart: PathBuf,

        /// Submit without asking
        #[arg(long)]
        yes: bool,
    },
}

/// Runs the terminal front-end.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, register crates at DEBUG; RUST_LOG overrides       │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → register.toml → REGISTER_* env → validate              │
/// │                                                                         │
/// │  3. Run the Requested Screen ─────────────────────────────────────────► │
/// │     • scan:     ScanScreen + TerminalCamera                             │
/// │     • checkout: ConfirmScreen + HttpPurchaseGateway                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> AppResult<()> {
    init_tracing();

    let config = RegisterConfig::load(cli.config)?;
    info!(
        locale = %config.store.locale,
        tax_rate_bps = config.store.tax_rate_bps,
        endpoint_configured = config.api.endpoint.is_some(),
        "Starting POP-UP STORE register"
    );

    match cli.command {
        Command::Scan => terminal::run_scan(&config).await,
        Command::Checkout { cart, yes } => terminal::run_checkout(&config, &cart, yes).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=register=trace` - Show trace for register crates only
/// - Default: INFO, with DEBUG for register crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,register=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
