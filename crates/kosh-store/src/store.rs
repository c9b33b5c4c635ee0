//! # Data Directory
//!
//! Layout of the data directory and access to the repositories.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <root>/                                                                │
//! │  ├── invoices/          <invoice_no>.json snapshots                    │
//! │  │                      (Invoice_<no>.pdf documents live here too)     │
//! │  ├── customers.json     customer master list                           │
//! │  └── items.json         item master list                               │
//! │                                                                         │
//! │  QR images and exports are written by kosh-docs into sibling           │
//! │  directories; this crate never touches them.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kosh_core::{Customer, Item};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::invoice::InvoiceRepository;
use crate::repository::master::MasterRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Storage configuration.
///
/// ## Example
/// ```rust
/// use kosh_store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/kosh").customers_file("clients.json");
/// assert!(config.customers_path().ends_with("clients.json"));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root data directory. Created on open if missing.
    pub root: PathBuf,

    /// Snapshot directory name under the root.
    /// Default: `invoices`
    pub invoices_dir: String,

    /// Customer master file name under the root.
    /// Default: `customers.json`
    pub customers_file: String,

    /// Item master file name under the root.
    /// Default: `items.json`
    pub items_file: String,
}

impl StoreConfig {
    /// Creates a configuration rooted at `root` with the default file names.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreConfig {
            root: root.into(),
            invoices_dir: "invoices".to_string(),
            customers_file: "customers.json".to_string(),
            items_file: "items.json".to_string(),
        }
    }

    /// Sets the customer master file name.
    pub fn customers_file(mut self, name: impl Into<String>) -> Self {
        self.customers_file = name.into();
        self
    }

    /// Sets the item master file name.
    pub fn items_file(mut self, name: impl Into<String>) -> Self {
        self.items_file = name.into();
        self
    }

    pub fn invoices_path(&self) -> PathBuf {
        self.root.join(&self.invoices_dir)
    }

    pub fn customers_path(&self) -> PathBuf {
        self.root.join(&self.customers_file)
    }

    pub fn items_path(&self) -> PathBuf {
        self.root.join(&self.items_file)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to an opened data directory.
///
/// Cheap to clone; repositories are created on demand and hold only paths.
///
/// ## Usage
/// ```rust,no_run
/// use kosh_store::{Store, StoreConfig};
///
/// let store = Store::open(StoreConfig::new("./data"))?;
/// let invoice = store.invoices().load("INV-001")?;
/// # Ok::<(), kosh_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Opens the data directory, creating the directory tree if absent.
    ///
    /// Master files are not created here; a missing file reads as empty.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(root = %config.root.display(), "Opening data directory");

        create_dir(&config.root)?;
        create_dir(&config.invoices_path())?;

        debug!("Data directory ready");
        Ok(Store { config })
    }

    /// Returns the configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Root data directory.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Returns the invoice snapshot repository.
    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.config.invoices_path())
    }

    /// Returns the customer master repository.
    pub fn customers(&self) -> MasterRepository<Customer> {
        MasterRepository::new(self.config.customers_path())
    }

    /// Returns the item master repository.
    pub fn items(&self) -> MasterRepository<Item> {
        MasterRepository::new(self.config.items_path())
    }
}

fn create_dir(path: &Path) -> StoreResult<()> {
    fs::create_dir_all(path).map_err(|e| StoreError::io(path, e))
}

// =============================================================================
// Unit Tests
// =============================================================================
