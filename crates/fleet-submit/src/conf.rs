//! Fixed submission identifiers and configuration.
//!
//! Downstream schedulers and operators match on these strings verbatim.

/// Hosted archive containing the producer and consumer applications.
pub const DEFAULT_JAR_URL: &str =
    "http://infinity-artifacts.s3.amazonaws.com/scale-tests/dcos-spark-scala-tests-assembly-20180523-fa29ab5.jar";

pub const PRODUCER_CLASS_NAME: &str = "KafkaRandomFeeder";
pub const CONSUMER_CLASS_NAME: &str = "KafkaWordCount";

/// Package providing the submission CLI.
pub const SPARK_PACKAGE_NAME: &str = "spark";

/// Endpoint names passed to endpoint resolution.
pub const BROKER_ENDPOINT: &str = "broker";
pub const STORE_ENDPOINT: &str = "native-client";

pub const SUPERVISE_FLAG: &str = "--supervise";
pub const CONF_FLAG: &str = "--conf";
pub const CLASS_FLAG: &str = "--class";
pub const MUST_FAIL_FLAG: &str = "--mustFailDueToInvalidArgument";
pub const SKIP_STORE_WRITES_FLAG: &str = "--shouldNotWriteToCassandra";

/// A single `--conf key=value` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfEntry {
    pub key: &'static str,
    pub value: &'static str,
}

impl ConfEntry {
    pub fn render(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Appended, in this order, to every submission.
pub const COMMON_CONF: &[ConfEntry] = &[
    ConfEntry { key: "spark.mesos.containerizer", value: "mesos" },
    ConfEntry { key: "spark.mesos.driver.failoverTimeout", value: "30" },
    ConfEntry { key: "spark.port.maxRetries", value: "32" },
    ConfEntry {
        key: "spark.mesos.executor.docker.image",
        value: "mesosphere/spark-dev:7081f3483a0d904992994edbed07abbc5110f003-815904ac6c6604ac82368a44d69f8a7423bcb8dc",
    },
    ConfEntry { key: "spark.mesos.executor.home", value: "/opt/spark/dist" },
    ConfEntry { key: "spark.scheduler.maxRegisteredResourcesWaitingTime", value: "2400s" },
    ConfEntry { key: "spark.scheduler.minRegisteredResourcesRatio", value: "1.0" },
];

/// `COMMON_CONF` as a flat `--conf k=v --conf k=v ...` argument list.
pub fn common_conf_args() -> Vec<String> {
    COMMON_CONF
        .iter()
        .flat_map(|entry| [CONF_FLAG.to_string(), entry.render()])
        .collect()
}
