//! Run configuration.
//!
//! Built by the CLI from its arguments; the driver never reads process
//! arguments itself.

use std::path::PathBuf;

use fleet_placement::StrategyKind;
use fleet_submit::ResourceCaps;
use fleet_submit::conf::DEFAULT_JAR_URL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub dispatcher_file: PathBuf,
    pub infrastructure_file: PathBuf,
    /// Appended to; never truncated.
    pub submissions_output_file: PathBuf,
    pub jar: String,
    pub strategy: StrategyKind,
    pub producers_per_broker: usize,
    pub consumers_per_producer: usize,
    pub producer: ProducerConfig,
    pub consumer: ConsumerConfig,
}

impl RunConfig {
    /// Configuration with every option at its default.
    pub fn new(
        dispatcher_file: impl Into<PathBuf>,
        infrastructure_file: impl Into<PathBuf>,
        submissions_output_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dispatcher_file: dispatcher_file.into(),
            infrastructure_file: infrastructure_file.into(),
            submissions_output_file: submissions_output_file.into(),
            jar: DEFAULT_JAR_URL.to_string(),
            strategy: StrategyKind::default(),
            producers_per_broker: 1,
            consumers_per_producer: 1,
            producer: ProducerConfig::default(),
            consumer: ConsumerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerConfig {
    /// 0 publishes forever and makes the producer supervised.
    pub number_of_words: u64,
    pub words_per_second: u64,
    pub resources: ResourceCaps,
    pub must_fail: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            number_of_words: 1,
            words_per_second: 1,
            resources: ResourceCaps {
                cores_max: 2,
                executor_cores: 2,
            },
            must_fail: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    pub batch_size_seconds: u64,
    pub write_to_store: bool,
    pub resources: ResourceCaps,
    pub must_fail: bool,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            batch_size_seconds: 10,
            write_to_store: false,
            resources: ResourceCaps {
                cores_max: 1,
                executor_cores: 1,
            },
            must_fail: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_table() {
        let c = RunConfig::new("d", "i", "o");
        assert_eq!(c.jar, DEFAULT_JAR_URL);
        assert_eq!(c.strategy, StrategyKind::Block);
        assert_eq!(c.producers_per_broker, 1);
        assert_eq!(c.consumers_per_producer, 1);
        assert_eq!(c.producer.number_of_words, 1);
        assert_eq!(c.producer.words_per_second, 1);
        assert_eq!(c.producer.resources.cores_max, 2);
        assert_eq!(c.producer.resources.executor_cores, 2);
        assert!(!c.producer.must_fail);
        assert_eq!(c.consumer.batch_size_seconds, 10);
        assert!(!c.consumer.write_to_store);
        assert_eq!(c.consumer.resources.cores_max, 1);
        assert_eq!(c.consumer.resources.executor_cores, 1);
        assert!(!c.consumer.must_fail);
    }

    #[test]
    fn serializes_for_logging() {
        let json = serde_json::to_string(&RunConfig::new("d", "i", "o")).unwrap();
        assert!(json.contains("\"strategy\":\"block\""));
    }
}
