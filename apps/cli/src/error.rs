//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in kosh                                  │
//! │                                                                         │
//! │  ConfigError ──────┐                                                    │
//! │  StoreError  ──────┤                                                    │
//! │  DocError    ──────┼──► AppError ──► code() ──► ErrorCode ──► exit code │
//! │  ValidationError ──┤                                                    │
//! │  draft JSON  ──────┘                                                    │
//! │                                                                         │
//! │  stderr: "error[VALIDATION_ERROR]: items[0].hsn is required"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use kosh_core::ValidationError;
use kosh_docs::DocError;
use kosh_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Stable, machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Snapshot or master record does not exist
    NotFound,

    /// Input failed validation
    ValidationError,

    /// Configuration could not be loaded
    ConfigError,

    /// Reading or writing the data directory failed
    StorageError,

    /// Document, QR code or export could not be produced
    RenderError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::RenderError => "RENDER_ERROR",
        }
    }

    /// Process exit status for this category.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::ConfigError => 4,
            ErrorCode::StorageError => 5,
            ErrorCode::RenderError => 6,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by `kosh` commands.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Document(#[from] DocError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The invoice draft file could not be read or parsed.
    #[error("Cannot read invoice draft {}: {message}", path.display())]
    Draft { path: PathBuf, message: String },

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Config(_) => ErrorCode::ConfigError,
            AppError::Store(err) if err.is_not_found() => ErrorCode::NotFound,
            AppError::Store(StoreError::InvalidKey { .. }) => ErrorCode::ValidationError,
            AppError::Store(_) => ErrorCode::StorageError,
            AppError::Document(DocError::InvalidInput(_)) => ErrorCode::ValidationError,
            AppError::Document(DocError::WriteFailure { .. }) => ErrorCode::StorageError,
            AppError::Document(_) => ErrorCode::RenderError,
            AppError::Validation(_) | AppError::Draft { .. } => ErrorCode::ValidationError,
            AppError::Output(_) => ErrorCode::StorageError,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code().exit_code())
    }
}

pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Unit Tests
// =============================================================================
