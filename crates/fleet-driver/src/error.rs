//! Driver error types.

use std::path::PathBuf;

use thiserror::Error;

pub type DriverResult<T> = Result<T, DriverError>;

/// Every error terminates the run; nothing is retried.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Inventory(#[from] fleet_core::InventoryError),

    #[error(transparent)]
    Placement(#[from] fleet_placement::PlacementError),

    #[error(transparent)]
    Cluster(#[from] fleet_submit::ClusterError),

    #[error(
        "job counts overflow: {num_brokers} brokers x {producers_per_broker} producers x \
         {consumers_per_producer} consumers"
    )]
    PlanOverflow {
        num_brokers: usize,
        producers_per_broker: usize,
        consumers_per_producer: usize,
    },

    #[error("cannot derive a name from {0:?}: nothing left after normalization")]
    InvalidName(String),

    /// The job is running but the ledger does not know about it.
    #[error(
        "submission {submission_id} on dispatcher {dispatcher} was accepted but could not be \
         recorded in {}: {source}",
        path.display()
    )]
    LedgerAppendFailed {
        dispatcher: String,
        submission_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
