//! fleet-driver: launches a fleet of paired producer and consumer jobs.
//!
//! A run walks `broker × producer × consumer` in order, allocating a
//! dispatcher for each job, building its spec, submitting it and recording
//! the `(dispatcher, submission-id)` pair in the ledger.
//!
//! # Architecture
//!
//! ```text
//! run
//!   ├── Inventory (fleet-core)             dispatchers + infrastructure
//!   ├── TopologyPlan                       job counts, derived names
//!   ├── DispatcherProvider (fleet-placement)
//!   ├── JobSpecBuilder + Cluster (fleet-submit)
//!   └── SubmissionLedger                   append-only audit file
//! ```
//!
//! Everything runs sequentially on the calling thread.

pub mod config;
pub mod driver;
pub mod error;
pub mod ledger;
pub mod plan;

pub use config::{ConsumerConfig, ProducerConfig, RunConfig};
pub use driver::{RunSummary, run, run_with_inventory};
pub use error::{DriverError, DriverResult};
pub use ledger::{Submission, SubmissionLedger};
pub use plan::{ConsumerNames, ProducerNames, TopologyPlan, normalize_name};
