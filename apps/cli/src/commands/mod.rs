//! # Commands
//!
//! One handler per subcommand. Handlers write their report to any
//! [`Write`] so tests can capture it; logging goes through `tracing`.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── dispatch
//! ├── invoice.rs  ◄─── generate, regenerate, show, search
//! └── master.rs   ◄─── customers, items
//! ```

pub mod invoice;
pub mod master;

use std::io::Write;

use kosh_store::InvoiceQuery;
use tracing::debug;

use crate::cli::{Command, CustomerAction, ItemAction};
use crate::error::AppResult;
use crate::state::AppState;

/// Runs one parsed subcommand.
pub fn execute(state: &AppState, command: Command, out: &mut impl Write) -> AppResult<()> {
    debug!(?command, "Executing command");

    match command {
        Command::Generate { file } => invoice::generate(state, &file, out).map(drop),
        Command::Regenerate { invoice_no } => {
            invoice::regenerate(state, &invoice_no, out).map(drop)
        }
        Command::Show { invoice_no } => invoice::show(state, &invoice_no, out),
        Command::Search { term, from, to } => {
            let query = InvoiceQuery { term, from, to };
            invoice::search(state, &query, out).map(drop)
        }
        Command::Customers { action } => match action {
            CustomerAction::List => master::list_customers(state, out).map(drop),
            CustomerAction::Add(args) => master::add_customer(state, args, out).map(drop),
        },
        Command::Items { action } => match action {
            ItemAction::List => master::list_items(state, out).map(drop),
            ItemAction::Add {
                description,
                hsn,
                rate,
            } => master::add_item(state, &description, &hsn, rate, out).map(drop),
        },
    }
}
