//! # Application State
//!
//! Everything a command needs, built once from [`AppConfig`].
//!
//! ```text
//! AppConfig ──┬──► store_config()     ──► Store            (snapshots, master data)
//!             └──► generator_config() ──► InvoiceGenerator (PDF, QR, CSV)
//! ```

use kosh_core::CurrencyFormat;
use kosh_docs::InvoiceGenerator;
use kosh_store::Store;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppResult;

/// Opened store plus configured generator.
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub generator: InvoiceGenerator,
}

impl AppState {
    /// Opens the data directory and builds the generator.
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let store = Store::open(config.store_config())?;
        let generator = InvoiceGenerator::new(config.generator_config());
        debug!(
            data_dir = %config.data_dir.display(),
            tax_rate_bps = config.tax_rate().bps(),
            "Application state ready"
        );
        Ok(AppState {
            config,
            store,
            generator,
        })
    }

    /// Currency format for terminal output.
    pub fn currency(&self) -> &CurrencyFormat {
        &self.config.layout.currency
    }
}
