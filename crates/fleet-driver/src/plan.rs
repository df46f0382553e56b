//! Topology plan and derived job names.
//!
//! For broker service `kafka-01`, producer ordinal `p` and consumer ordinal
//! `c`:
//!
//! ```text
//! producer name / topic   kafka_01-<p>
//! keyspace                kafka_01_<p>
//! consumer group          kafka_01-<p>-<c>
//! table                   table_<c>
//! ```

use serde::Serialize;

use crate::error::{DriverError, DriverResult};

/// Job counts fixed at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopologyPlan {
    pub num_brokers: usize,
    pub producers_per_broker: usize,
    pub consumers_per_producer: usize,
    pub num_producers: usize,
    pub num_consumers: usize,
    pub num_jobs: usize,
}

impl TopologyPlan {
    /// Fails with [`DriverError::PlanOverflow`] when any count does not fit
    /// in `usize`.
    pub fn new(
        num_brokers: usize,
        producers_per_broker: usize,
        consumers_per_producer: usize,
    ) -> DriverResult<Self> {
        let overflow = || DriverError::PlanOverflow {
            num_brokers,
            producers_per_broker,
            consumers_per_producer,
        };
        let num_producers = num_brokers
            .checked_mul(producers_per_broker)
            .ok_or_else(overflow)?;
        let num_consumers = num_producers
            .checked_mul(consumers_per_producer)
            .ok_or_else(overflow)?;
        let num_jobs = num_producers
            .checked_add(num_consumers)
            .ok_or_else(overflow)?;
        Ok(Self {
            num_brokers,
            producers_per_broker,
            consumers_per_producer,
            num_producers,
            num_consumers,
            num_jobs,
        })
    }
}

/// Restrict `raw` to `[A-Za-z0-9_]`.
///
/// Every other character becomes `_`, then leading underscores are dropped
/// so the result starts with a letter or digit. Case is preserved.
pub fn normalize_name(raw: &str) -> DriverResult<String> {
    let replaced: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    let trimmed = replaced.trim_start_matches('_');
    if trimmed.is_empty() {
        return Err(DriverError::InvalidName(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Names shared by a producer and all of its consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerNames {
    pub name: String,
    pub topic: String,
    pub keyspace: String,
}

impl ProducerNames {
    pub fn derive(broker_service: &str, ordinal: usize) -> DriverResult<Self> {
        let name = format!("{}-{ordinal}", normalize_name(broker_service)?);
        let keyspace = normalize_name(&name)?;
        Ok(Self {
            topic: name.clone(),
            name,
            keyspace,
        })
    }

    pub fn consumer(&self, ordinal: usize) -> ConsumerNames {
        ConsumerNames {
            group_id: format!("{}-{ordinal}", self.name),
            table: format!("table_{ordinal}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerNames {
    pub group_id: String,
    pub table: String,
}
