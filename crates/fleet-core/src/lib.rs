//! fleet-core: inventory types shared across StreamFleet crates.
//!
//! The inventory is the pair of inputs a fanout run starts from:
//!
//! - a dispatcher file, one `service,driver-role,executor-role` record per line
//! - an infrastructure document listing broker clusters and the store cluster
//!
//! Both are validated up front so that a malformed inventory aborts the run
//! before anything is installed or submitted.

pub mod dispatcher;
pub mod error;
pub mod inventory;

pub use dispatcher::{DispatcherRecord, parse_dispatchers};
pub use error::{InventoryError, InventoryResult};
pub use inventory::{BrokerCluster, Infrastructure, Inventory, NodeCount, ServiceRef, StoreCluster};
