//! # Kosh CLI
//!
//! Command-line front end for Kosh Billing.
//!
//! ## Module Organization
//! ```text
//! kosh_cli/
//! ├── lib.rs          ◄─── You are here (tracing setup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── defaults → kosh.toml → KOSH_* environment
//! ├── state.rs        ◄─── Store + InvoiceGenerator built from config
//! ├── commands/
//! │   ├── mod.rs      ◄─── dispatch
//! │   ├── invoice.rs  ◄─── generate / regenerate / show / search
//! │   └── master.rs   ◄─── customers / items
//! └── error.rs        ◄─── AppError and exit codes
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments                                                     │
//! │  2. Initialize tracing (RUST_LOG, else warn / debug with -v)            │
//! │  3. Load AppConfig, apply --data-dir                                    │
//! │  4. Open AppState (creates the data directory layout)                   │
//! │  5. Execute the command, report errors as error[CODE] on stderr         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::AppConfig;
use error::AppResult;
use state::AppState;

/// Parses arguments, runs the command and maps the outcome to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = %err.code(), error = %err, "Command failed");
            eprintln!("error[{}]: {err}", err.code());
            err.exit_code()
        }
    }
}

/// Runs an already parsed command line, writing the report to stdout.
pub fn run_cli(cli: Cli) -> AppResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    info!(data_dir = %config.data_dir.display(), "Starting kosh");

    let state = AppState::open(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::execute(&state, cli.command, &mut out)
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set. Logs go to stderr so command output stays
/// clean on stdout.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info,kosh=debug" } else { "warn,kosh=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
