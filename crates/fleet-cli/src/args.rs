use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fleet_driver::{ConsumerConfig, ProducerConfig, RunConfig};
use fleet_placement::StrategyKind;
use fleet_submit::ResourceCaps;
use fleet_submit::conf::DEFAULT_JAR_URL;

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "streamfleet",
    about = "Launch Kafka producer and Cassandra-writing consumer jobs across Spark dispatchers",
    version
)]
pub struct Cli {
    /// File path to the dispatcher list (`service,driver-role,executor-role` per line)
    pub dispatcher_file: PathBuf,

    /// File path to the infrastructure description (JSON, or TOML by extension)
    pub infrastructure_file: PathBuf,

    /// File path to append `dispatcher,submission-id` pairs to
    pub submissions_output_file: PathBuf,

    /// Hosted JAR URL
    #[arg(long, default_value = DEFAULT_JAR_URL)]
    pub jar: String,

    /// Dispatcher providing strategy: block or round-robin
    #[arg(long, default_value = "block")]
    pub strategy: StrategyKind,

    /// Cluster CLI binary used for installs, endpoint lookups and submissions
    #[arg(long, default_value = "dcos")]
    pub cli: PathBuf,

    /// Log output format: text or json
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Number of producers per Kafka cluster to create
    #[arg(long, default_value_t = 1)]
    pub num_producers_per_kafka: usize,

    /// Number of consumers per producer to create
    #[arg(long, default_value_t = 1)]
    pub num_consumers_per_producer: usize,

    /// Number of total words published by each producer (0 = infinite, supervised)
    #[arg(long, default_value_t = 1)]
    pub producer_number_of_words: u64,

    /// Number of words per second published by each producer
    #[arg(long, default_value_t = 1)]
    pub producer_words_per_second: u64,

    /// spark.cores.max for producers
    #[arg(long, default_value_t = 2)]
    pub producer_spark_cores_max: u32,

    /// spark.executor.cores for producers
    #[arg(long, default_value_t = 2)]
    pub producer_spark_executor_cores: u32,

    /// Pass producers an invalid argument so they fail
    #[arg(long)]
    pub producer_must_fail: bool,

    /// Seconds each consumer accumulates entries per batch
    #[arg(long, default_value_t = 10)]
    pub consumer_batch_size_seconds: u64,

    /// Let consumers write to Cassandra
    #[arg(long)]
    pub consumer_write_to_cassandra: bool,

    /// spark.cores.max for consumers
    #[arg(long, default_value_t = 1)]
    pub consumer_spark_cores_max: u32,

    /// spark.executor.cores for consumers
    #[arg(long, default_value_t = 1)]
    pub consumer_spark_executor_cores: u32,

    /// Pass consumers an invalid argument so they fail
    #[arg(long)]
    pub consumer_must_fail: bool,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            dispatcher_file: self.dispatcher_file.clone(),
            infrastructure_file: self.infrastructure_file.clone(),
            submissions_output_file: self.submissions_output_file.clone(),
            jar: self.jar.clone(),
            strategy: self.strategy,
            producers_per_broker: self.num_producers_per_kafka,
            consumers_per_producer: self.num_consumers_per_producer,
            producer: ProducerConfig {
                number_of_words: self.producer_number_of_words,
                words_per_second: self.producer_words_per_second,
                resources: ResourceCaps {
                    cores_max: self.producer_spark_cores_max,
                    executor_cores: self.producer_spark_executor_cores,
                },
                must_fail: self.producer_must_fail,
            },
            consumer: ConsumerConfig {
                batch_size_seconds: self.consumer_batch_size_seconds,
                write_to_store: self.consumer_write_to_cassandra,
                resources: ResourceCaps {
                    cores_max: self.consumer_spark_cores_max,
                    executor_cores: self.consumer_spark_executor_cores,
                },
                must_fail: self.consumer_must_fail,
            },
        }
    }
}
