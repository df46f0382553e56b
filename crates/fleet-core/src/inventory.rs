//! Infrastructure document and inventory loading.
//!
//! The infrastructure document is JSON by default:
//!
//! ```text
//! {
//!   "kafka":     [ { "package_name": "...", "service": { "name": "..." } } ],
//!   "cassandra": [ { "package_name": "...", "service": { "name": "..." }, "nodes": { "count": 3 } } ]
//! }
//! ```
//!
//! A file with a `.toml` extension is read as TOML with the same shape.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dispatcher::{DispatcherRecord, parse_dispatchers};
use crate::error::{InventoryError, InventoryResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCount {
    pub count: u32,
}

/// A message-broker cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerCluster {
    pub package_name: String,
    pub service: ServiceRef,
}

impl BrokerCluster {
    pub fn service_name(&self) -> &str {
        &self.service.name
    }
}

/// A wide-column store cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCluster {
    pub package_name: String,
    pub service: ServiceRef,
    /// Informational only.
    pub nodes: NodeCount,
}

impl StoreCluster {
    pub fn service_name(&self) -> &str {
        &self.service.name
    }
}

/// The raw infrastructure document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infrastructure {
    #[serde(rename = "kafka", alias = "brokers")]
    pub brokers: Vec<BrokerCluster>,
    #[serde(rename = "cassandra", alias = "stores")]
    pub stores: Vec<StoreCluster>,
}

impl Infrastructure {
    /// Parse a document, choosing the format from the file extension.
    pub fn parse(content: &str, path: &Path) -> InventoryResult<Self> {
        let shape = |reason: String| InventoryError::Shape {
            path: path.to_path_buf(),
            reason,
        };
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        if is_toml {
            toml::from_str(content).map_err(|e| shape(e.to_string()))
        } else {
            serde_json::from_str(content).map_err(|e| shape(e.to_string()))
        }
    }
}

/// A validated inventory: dispatchers, broker clusters and the single store
/// cluster a run writes to.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub dispatchers: Vec<DispatcherRecord>,
    pub brokers: Vec<BrokerCluster>,
    pub store: StoreCluster,
}

impl Inventory {
    /// Read and validate both inventory files.
    pub fn load(dispatcher_file: &Path, infrastructure_file: &Path) -> InventoryResult<Self> {
        let dispatchers = parse_dispatchers(&read(dispatcher_file)?, dispatcher_file)?;
        let infrastructure = Infrastructure::parse(&read(infrastructure_file)?, infrastructure_file)?;
        let inventory = Self::from_parts(dispatchers, infrastructure, infrastructure_file)?;

        debug!(
            dispatchers = inventory.dispatchers.len(),
            brokers = inventory.brokers.len(),
            store = %inventory.store.service_name(),
            "inventory loaded"
        );
        Ok(inventory)
    }

    /// Validate an already-parsed infrastructure document.
    ///
    /// Only the first store entry is used; any further entries are ignored.
    pub fn from_parts(
        dispatchers: Vec<DispatcherRecord>,
        infrastructure: Infrastructure,
        infrastructure_file: &Path,
    ) -> InventoryResult<Self> {
        let shape = |reason: &str| InventoryError::Shape {
            path: infrastructure_file.to_path_buf(),
            reason: reason.to_string(),
        };

        if infrastructure.brokers.is_empty() {
            return Err(shape("`kafka` must list at least one broker cluster"));
        }
        let Some(store) = infrastructure.stores.into_iter().next() else {
            return Err(shape("`cassandra` must list at least one store cluster"));
        };

        Ok(Self {
            dispatchers,
            brokers: infrastructure.brokers,
            store,
        })
    }
}

fn read(path: &Path) -> InventoryResult<String> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => InventoryError::Missing {
            path: PathBuf::from(path),
        },
        _ => InventoryError::Read {
            path: PathBuf::from(path),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const INFRA_JSON: &str = r#"{
        "kafka": [
            { "package_name": "beta-kafka", "service": { "name": "kafka-01" } },
            { "package_name": "beta-kafka", "service": { "name": "kafka-02" } }
        ],
        "cassandra": [
            { "package_name": "cassandra", "service": { "name": "cassandra-01" }, "nodes": { "count": 3 } }
        ]
    }"#;

    fn write_inventory(dispatchers: &str, infra_name: &str, infra: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path().join("dispatchers.txt");
        let i = dir.path().join(infra_name);
        fs::write(&d, dispatchers).unwrap();
        fs::write(&i, infra).unwrap();
        (dir, d, i)
    }

    #[test]
    fn loads_json_inventory() {
        let (_dir, d, i) = write_inventory("d0,rA,rB\n", "infra.json", INFRA_JSON);
        let inv = Inventory::load(&d, &i).unwrap();

        assert_eq!(inv.dispatchers.len(), 1);
        assert_eq!(inv.brokers.len(), 2);
        assert_eq!(inv.brokers[1].service_name(), "kafka-02");
        assert_eq!(inv.store.package_name, "cassandra");
        assert_eq!(inv.store.nodes.count, 3);
    }

    #[test]
    fn loads_toml_inventory() {
        let infra = r#"
[[kafka]]
package_name = "k"
service = { name = "kk" }

[[cassandra]]
package_name = "c"
service = { name = "cc" }
nodes = { count = 3 }
"#;
        let (_dir, d, i) = write_inventory("d0,rA,rB\n", "infra.toml", infra);
        let inv = Inventory::load(&d, &i).unwrap();
        assert_eq!(inv.brokers[0].service_name(), "kk");
        assert_eq!(inv.store.service_name(), "cc");
    }

    #[test]
    fn uses_first_store_only() {
        let infra = r#"{
            "kafka": [ { "package_name": "k", "service": { "name": "kk" } } ],
            "cassandra": [
                { "package_name": "c1", "service": { "name": "first" }, "nodes": { "count": 1 } },
                { "package_name": "c2", "service": { "name": "second" }, "nodes": { "count": 1 } }
            ]
        }"#;
        let (_dir, d, i) = write_inventory("d0,rA,rB\n", "infra.json", infra);
        let inv = Inventory::load(&d, &i).unwrap();
        assert_eq!(inv.store.service_name(), "first");
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let (dir, d, _i) = write_inventory("d0,rA,rB\n", "infra.json", INFRA_JSON);
        let absent = dir.path().join("nope.json");
        let err = Inventory::load(&d, &absent).unwrap_err();
        assert!(matches!(err, InventoryError::Missing { ref path } if *path == absent));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn missing_field_is_a_shape_error() {
        let infra = r#"{ "kafka": [ { "package_name": "k", "service": { "name": "kk" } } ] }"#;
        let (_dir, d, i) = write_inventory("d0,rA,rB\n", "infra.json", infra);
        let err = Inventory::load(&d, &i).unwrap_err();
        assert!(matches!(err, InventoryError::Shape { .. }));
        assert!(err.to_string().contains("cassandra"), "{err}");
    }

    #[test]
    fn empty_store_list_is_a_shape_error() {
        let infra = r#"{
            "kafka": [ { "package_name": "k", "service": { "name": "kk" } } ],
            "cassandra": []
        }"#;
        let (_dir, d, i) = write_inventory("d0,rA,rB\n", "infra.json", infra);
        let err = Inventory::load(&d, &i).unwrap_err();
        assert!(matches!(err, InventoryError::Shape { .. }));
    }

    #[test]
    fn empty_broker_list_is_a_shape_error() {
        let infra = r#"{
            "kafka": [],
            "cassandra": [ { "package_name": "c", "service": { "name": "cc" }, "nodes": { "count": 3 } } ]
        }"#;
        let (_dir, d, i) = write_inventory("d0,rA,rB\n", "infra.json", infra);
        let err = Inventory::load(&d, &i).unwrap_err();
        assert!(err.to_string().contains("kafka"), "{err}");
    }

    #[test]
    fn malformed_dispatcher_aborts_load() {
        let (_dir, d, i) = write_inventory("d0,rA,rB\nd1;rA;rB\n", "infra.json", INFRA_JSON);
        let err = Inventory::load(&d, &i).unwrap_err();
        assert!(matches!(err, InventoryError::DispatcherParse { line: 2, .. }));
    }
}
