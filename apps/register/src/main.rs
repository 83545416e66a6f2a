//! # Register Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        POP-UP STORE Register                            │
//! │                                                                         │
//! │  main.rs ────► parses arguments, starts the runtime                     │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, dispatch                                │
//! │                                                                         │
//! │  screens/ ───► ScanScreen, ConfirmScreen                                │
//! │                                                                         │
//! │  state/ ─────► CartState, RegisterConfig                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    let cli = register_app::Cli::parse();

    match register_app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error [{:?}]: {}", err.code, err.message);
            ExitCode::FAILURE
        }
    }
}
