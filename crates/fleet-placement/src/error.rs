//! Placement error types.

use thiserror::Error;

pub type PlacementResult<T> = Result<T, PlacementError>;

#[derive(Debug, Error)]
pub enum PlacementError {
    /// `provide()` was called more often than the plan allows.
    #[error("dispatcher allocation exhausted after {num_jobs} jobs")]
    ExhaustedAllocation { num_jobs: usize },

    #[error("no dispatchers available for {num_jobs} jobs")]
    NoDispatchers { num_jobs: usize },

    #[error("unknown providing strategy: {0} (expected `block` or `round-robin`)")]
    UnknownStrategy(String),
}
