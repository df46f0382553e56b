//! Inventory error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for inventory loading.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors raised while reading the dispatcher file or the infrastructure
/// document. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: malformed dispatcher record {content:?}: {reason}", path.display())]
    DispatcherParse {
        path: PathBuf,
        line: usize,
        content: String,
        reason: String,
    },

    #[error("invalid infrastructure document {}: {reason}", path.display())]
    Shape { path: PathBuf, reason: String },
}
