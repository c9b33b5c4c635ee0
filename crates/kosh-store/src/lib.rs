//! # kosh-store: Record Storage for Kosh Billing
//!
//! This crate keeps the records the billing tool needs between runs:
//! invoice snapshots (for regeneration and search) and the customer and
//! item master lists (for pre-filling forms).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kosh Billing Data Flow                           │
//! │                                                                         │
//! │  CLI command (generate / search / customers add)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   kosh-store (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────────────────────┐ │   │
//! │  │   │    Store      │    │           Repositories              │ │   │
//! │  │   │  (store.rs)   │    │                                     │ │   │
//! │  │   │               │    │  InvoiceRepository   (invoice.rs)   │ │   │
//! │  │   │  data dir     │◄───│  MasterRepository<Customer>         │ │   │
//! │  │   │  layout       │    │  MasterRepository<Item> (master.rs) │ │   │
//! │  │   └───────────────┘    └─────────────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  <data_dir>/invoices/<no>.json   customers.json   items.json    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Data directory layout and repository access
//! - [`error`] - Storage error types
//! - [`repository`] - Invoice snapshots and master data
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kosh_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("./data"))?;
//! let recent = store.invoices().search(&Default::default())?;
//! let customers = store.customers().load_all()?;
//! # Ok::<(), kosh_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::invoice::{InvoiceQuery, InvoiceRepository};
pub use repository::master::{MasterRepository, UpsertOutcome};
