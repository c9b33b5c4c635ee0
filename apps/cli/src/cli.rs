//! # Command-Line Arguments
//!
//! ```text
//! kosh [--config PATH] [--data-dir PATH] [-v] <COMMAND>
//!
//!   generate <FILE>                 draft JSON → PDF + QR + CSV + snapshot
//!   regenerate <INVOICE_NO>         rebuild artifacts from the snapshot
//!   show <INVOICE_NO>               line figures and totals
//!   search [TERM] [--from] [--to]   saved invoices, newest first
//!   customers list | add <NAME>     customer master data
//!   items list | add <DESCRIPTION>  item master data
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "kosh", version, about = "Tax invoices with QR verification and CSV export")]
pub struct Cli {
    /// Configuration file (default: platform config dir / kosh.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory; overrides config and KOSH_DATA_DIR
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an invoice from a draft JSON file
    Generate {
        /// Draft with invoice_no, customer, items and optional date
        file: PathBuf,
    },

    /// Regenerate artifacts for a saved invoice
    Regenerate { invoice_no: String },

    /// Print the figures of a saved invoice
    Show { invoice_no: String },

    /// Search saved invoices by customer, number or date
    Search {
        /// Case-insensitive substring
        term: Option<String>,

        /// Earliest date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Customer master data
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Item master data
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerAction {
    /// List saved customers
    List,
    /// Add or update a customer
    Add(CustomerArgs),
}

#[derive(Args, Debug)]
pub struct CustomerArgs {
    pub name: String,

    #[arg(long)]
    pub bill_to: Option<String>,

    #[arg(long)]
    pub ship_to: Option<String>,

    #[arg(long)]
    pub mobile: Option<String>,

    #[arg(long)]
    pub gstin: Option<String>,

    #[arg(long)]
    pub pan: Option<String>,

    #[arg(long)]
    pub state: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// List saved items
    List,
    /// Add or update an item
    Add {
        description: String,

        /// HSN tax classification code
        #[arg(long)]
        hsn: String,

        /// Unit rate
        #[arg(long)]
        rate: Decimal,
    },
}
