//! # Storage Error Types
//!
//! Error types for snapshot and master-data file operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the file path and categorization      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in the CLI) ← Stable error code + exit status               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found.
    ///
    /// ## When This Occurs
    /// - `regenerate` / `show` for an invoice number never saved
    /// - Master record lookup by unknown key
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// File system failure.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created (permissions, read-only disk)
    /// - Disk full while writing a snapshot
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exists but does not hold the expected JSON.
    #[error("Malformed data in {}: {message}", path.display())]
    Serialization { path: PathBuf, message: String },

    /// A key cannot be used as a file name.
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn serialization(path: &Path, err: serde_json::Error) -> Self {
        StoreError::Serialization {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// True for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
