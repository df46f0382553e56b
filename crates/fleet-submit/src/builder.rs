//! Job-spec builder.
//!
//! Produces the exact argument vectors the submission subsystem expects.
//! A job spec has two halves:
//!
//! - `app_args`: handed to the application (`--flag value` pairs, plus
//!   value-less fault and persistence flags)
//! - `submit_args`: handed to the submission framework (resource caps,
//!   main class, supervision, then the common configuration block)

use serde::{Deserialize, Serialize};

use crate::conf::{
    CLASS_FLAG, CONF_FLAG, CONSUMER_CLASS_NAME, MUST_FAIL_FLAG, PRODUCER_CLASS_NAME,
    SKIP_STORE_WRITES_FLAG, SUPERVISE_FLAG, common_conf_args,
};
use crate::error::{ClusterError, ClusterResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Producer,
    Consumer,
}

/// A fully-built submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub kind: JobKind,
    /// Service name of the dispatcher that receives the submission.
    pub dispatcher: String,
    /// Role the driver and its executors are launched under.
    pub executor_role: String,
    pub app_url: String,
    pub app_args: Vec<String>,
    pub submit_args: Vec<String>,
}

impl JobSpec {
    pub fn is_supervised(&self) -> bool {
        self.submit_args.iter().any(|a| a == SUPERVISE_FLAG)
    }

    /// Value following `flag` in the application arguments.
    pub fn app_arg(&self, flag: &str) -> Option<&str> {
        self.app_args
            .iter()
            .position(|a| a == flag)
            .and_then(|idx| self.app_args.get(idx + 1))
            .map(String::as_str)
    }

    pub fn has_app_flag(&self, flag: &str) -> bool {
        self.app_args.iter().any(|a| a == flag)
    }

    /// Value of a `--conf key=value` submission setting.
    pub fn conf(&self, key: &str) -> Option<&str> {
        self.submit_args
            .windows(2)
            .filter(|pair| pair[0] == CONF_FLAG)
            .find_map(|pair| {
                pair[1]
                    .strip_prefix(key)
                    .and_then(|rest| rest.strip_prefix('='))
            })
    }

    /// Main class passed via `--class`.
    pub fn class_name(&self) -> Option<&str> {
        self.submit_args
            .iter()
            .position(|a| a == CLASS_FLAG)
            .and_then(|idx| self.submit_args.get(idx + 1))
            .map(String::as_str)
    }
}

/// Resource caps applied to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCaps {
    pub cores_max: u32,
    pub executor_cores: u32,
}

impl ResourceCaps {
    fn conf_args(&self) -> [String; 4] {
        [
            CONF_FLAG.to_string(),
            format!("spark.cores.max={}", self.cores_max),
            CONF_FLAG.to_string(),
            format!("spark.executor.cores={}", self.executor_cores),
        ]
    }
}

/// Connection settings for the single store cluster all consumers share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConnection {
    pub hosts: Vec<String>,
    pub port: String,
}

impl StoreConnection {
    /// Split `host:port` endpoints into a host list and one shared port.
    ///
    /// Every endpoint must carry a port and all ports must agree.
    pub fn from_endpoints(endpoints: &[String]) -> ClusterResult<Self> {
        let malformed = ClusterError::MalformedStoreEndpoints;

        let mut hosts = Vec::with_capacity(endpoints.len());
        let mut port: Option<&str> = None;
        for endpoint in endpoints {
            let (host, p) = endpoint
                .rsplit_once(':')
                .filter(|(h, p)| !h.is_empty() && !p.is_empty())
                .ok_or_else(|| malformed(format!("{endpoint:?} is not host:port")))?;
            match port {
                Some(first) if first != p => {
                    return Err(malformed(format!(
                        "endpoints disagree on port ({first} vs {p} for {host})"
                    )));
                }
                Some(_) => {}
                None => port = Some(p),
            }
            hosts.push(host.to_string());
        }

        let port = port.ok_or_else(|| malformed("no endpoints resolved".to_string()))?;
        Ok(Self {
            hosts,
            port: port.to_string(),
        })
    }
}

/// Inputs for a producer submission.
#[derive(Debug, Clone)]
pub struct ProducerParams<'a> {
    pub broker_endpoints: &'a [String],
    pub dispatcher: &'a str,
    pub executor_role: &'a str,
    pub topic: &'a str,
    /// Total words to publish; 0 means an unbounded stream.
    pub number_of_words: u64,
    pub words_per_second: u64,
    pub resources: ResourceCaps,
    pub must_fail: bool,
}

/// Inputs for a consumer submission.
#[derive(Debug, Clone)]
pub struct ConsumerParams<'a> {
    pub broker_endpoints: &'a [String],
    pub store: &'a StoreConnection,
    pub dispatcher: &'a str,
    pub executor_role: &'a str,
    pub topic: &'a str,
    pub group_id: &'a str,
    pub write_to_store: bool,
    pub batch_size_seconds: u64,
    pub keyspace: &'a str,
    pub table: &'a str,
    pub resources: ResourceCaps,
    pub must_fail: bool,
}

/// Builds producer and consumer job specs against one application archive.
#[derive(Debug, Clone)]
pub struct JobSpecBuilder {
    app_url: String,
}

impl JobSpecBuilder {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into(),
        }
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    pub fn producer(&self, p: &ProducerParams<'_>) -> JobSpec {
        let mut app_args = vec![
            "--appName".to_string(),
            PRODUCER_CLASS_NAME.to_string(),
            "--brokers".to_string(),
            p.broker_endpoints.join(","),
            "--topics".to_string(),
            p.topic.to_string(),
            "--numberOfWords".to_string(),
            p.number_of_words.to_string(),
            "--wordsPerSecond".to_string(),
            p.words_per_second.to_string(),
        ];
        if p.must_fail {
            app_args.push(MUST_FAIL_FLAG.to_string());
        }

        let mut submit_args: Vec<String> = p.resources.conf_args().into();
        submit_args.extend([CLASS_FLAG.to_string(), PRODUCER_CLASS_NAME.to_string()]);
        // An unbounded stream is restarted if its driver dies.
        if p.number_of_words == 0 {
            submit_args.push(SUPERVISE_FLAG.to_string());
        }
        submit_args.extend(common_conf_args());

        JobSpec {
            kind: JobKind::Producer,
            dispatcher: p.dispatcher.to_string(),
            executor_role: p.executor_role.to_string(),
            app_url: self.app_url.clone(),
            app_args,
            submit_args,
        }
    }

    pub fn consumer(&self, c: &ConsumerParams<'_>) -> JobSpec {
        let mut app_args = vec![
            "--appName".to_string(),
            CONSUMER_CLASS_NAME.to_string(),
            "--brokers".to_string(),
            c.broker_endpoints.join(","),
            "--topics".to_string(),
            c.topic.to_string(),
            "--groupId".to_string(),
            c.group_id.to_string(),
            "--batchSizeSeconds".to_string(),
            c.batch_size_seconds.to_string(),
            "--cassandraKeyspace".to_string(),
            c.keyspace.to_string(),
            "--cassandraTable".to_string(),
            c.table.to_string(),
        ];
        if c.must_fail {
            app_args.push(MUST_FAIL_FLAG.to_string());
        }
        if !c.write_to_store {
            app_args.push(SKIP_STORE_WRITES_FLAG.to_string());
        }

        let mut submit_args = vec![SUPERVISE_FLAG.to_string()];
        submit_args.extend(c.resources.conf_args());
        submit_args.extend([
            CONF_FLAG.to_string(),
            format!("spark.cassandra.connection.host={}", c.store.hosts.join(",")),
            CONF_FLAG.to_string(),
            format!("spark.cassandra.connection.port={}", c.store.port),
            CLASS_FLAG.to_string(),
            CONSUMER_CLASS_NAME.to_string(),
        ]);
        submit_args.extend(common_conf_args());

        JobSpec {
            kind: JobKind::Consumer,
            dispatcher: c.dispatcher.to_string(),
            executor_role: c.executor_role.to_string(),
            app_url: self.app_url.clone(),
            app_args,
            submit_args,
        }
    }
}
