//! fleet-submit: everything between a planned job and a submission id.
//!
//! - **`conf`**: fixed identifiers and the common configuration block every
//!   submission carries
//! - **`builder`**: bit-exact argument vectors for producer and consumer jobs
//! - **`cluster`**: the `Cluster` trait (install / resolve / submit) and the
//!   CLI-backed implementation

pub mod builder;
pub mod cluster;
pub mod conf;
pub mod error;

pub use builder::{ConsumerParams, JobKind, JobSpec, JobSpecBuilder, ProducerParams, ResourceCaps, StoreConnection};
pub use cluster::{Cluster, DcosCluster};
pub use error::{ClusterError, ClusterResult};
