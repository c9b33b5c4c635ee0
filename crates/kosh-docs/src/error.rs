//! # Document Error Types
//!
//! Errors raised while producing invoice artifacts.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind            Severity      Raised by                                │
//! │  ──────────────  ────────────  ───────────────────────────────────────  │
//! │  InvalidInput    fatal         orchestrator, before any file is written │
//! │  AssetMissing    recoverable   logo / font loaders (render continues)   │
//! │  AssetInvalid    recoverable   logo / font loaders (render continues)   │
//! │  WriteFailure    fatal         artifact writes (no retry, no rollback)  │
//! │  Render          fatal         PDF backend                              │
//! │  Encode          fatal         QR / PNG / CSV encoders                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use kosh_core::ValidationError;
use thiserror::Error;

/// Artifact generation errors.
#[derive(Debug, Error)]
pub enum DocError {
    /// The invoice cannot be turned into artifacts.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// An optional asset is configured but absent.
    #[error("Asset not found: {}", path.display())]
    AssetMissing { path: PathBuf },

    /// An optional asset exists but cannot be decoded.
    #[error("Asset unreadable: {}: {reason}", path.display())]
    AssetInvalid { path: PathBuf, reason: String },

    /// An artifact could not be written.
    ///
    /// ## When This Occurs
    /// - Output directory not writable
    /// - A directory sits where the artifact file should go
    /// - Disk full
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF backend rejected the document.
    #[error("Render failed: {0}")]
    Render(String),

    /// QR, PNG or CSV encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl DocError {
    /// True when generation may continue without the failed piece.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DocError::AssetMissing { .. } | DocError::AssetInvalid { .. }
        )
    }

    pub(crate) fn write_failure(path: &Path, source: std::io::Error) -> Self {
        DocError::WriteFailure {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<printpdf::Error> for DocError {
    fn from(err: printpdf::Error) -> Self {
        DocError::Render(err.to_string())
    }
}

impl From<qrcode::types::QrError> for DocError {
    fn from(err: qrcode::types::QrError) -> Self {
        DocError::Encode(err.to_string())
    }
}

impl From<image::ImageError> for DocError {
    fn from(err: image::ImageError) -> Self {
        DocError::Encode(err.to_string())
    }
}

impl From<csv::Error> for DocError {
    fn from(err: csv::Error) -> Self {
        DocError::Encode(err.to_string())
    }
}

/// Result type for artifact operations.
pub type DocResult<T> = Result<T, DocError>;

// =============================================================================
// Unit Tests
// =============================================================================
