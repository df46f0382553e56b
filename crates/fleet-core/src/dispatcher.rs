//! Dispatcher records.
//!
//! A dispatcher is a long-lived job submission service. The dispatcher file
//! lists one per line as `service-name,driver-role,executor-role`, with no
//! header and no quoting.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};

/// A single dispatcher entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherRecord {
    /// Service name, unique within a run.
    pub service_name: String,
    pub driver_role: String,
    /// Role the submitted drivers run under.
    pub executor_role: String,
}

impl DispatcherRecord {
    pub fn new(
        service_name: impl Into<String>,
        driver_role: impl Into<String>,
        executor_role: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            driver_role: driver_role.into(),
            executor_role: executor_role.into(),
        }
    }

    /// Parse one `service,driver-role,executor-role` line.
    ///
    /// Fields are split on every `,` (there is no quoting) and whitespace
    /// around each field is discarded, so `d0, rA ,rB\r` reads as
    /// `d0,rA,rB`. Returns the reason on failure; the caller attaches file
    /// and line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [service_name, driver_role, executor_role] = fields.as_slice() else {
            return Err(format!("expected 3 comma-separated fields, found {}", fields.len()));
        };
        if service_name.is_empty() {
            return Err("empty service name".to_string());
        }
        Ok(Self::new(*service_name, *driver_role, *executor_role))
    }
}

impl fmt::Display for DispatcherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.service_name, self.driver_role, self.executor_role)
    }
}

/// Parse the contents of a dispatcher file.
///
/// Blank lines are skipped; every other line must be a valid record.
/// `path` is only used for error reporting.
pub fn parse_dispatchers(content: &str, path: &Path) -> InventoryResult<Vec<DispatcherRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            DispatcherRecord::parse(line).map_err(|reason| InventoryError::DispatcherParse {
                path: path.to_path_buf(),
                line: idx + 1,
                content: line.to_string(),
                reason,
            })
        })
        .collect()
}
