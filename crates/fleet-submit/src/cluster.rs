//! Cluster collaborators: package CLI installation, endpoint resolution and
//! job submission.
//!
//! The driver only talks to the [`Cluster`] trait. [`DcosCluster`] implements
//! it by shelling out to the cluster CLI:
//!
//! ```text
//! <cli> package install <package> --yes --cli
//! <cli> <package> --name=<service> endpoints <endpoint>
//! <cli> spark --name=<dispatcher> run --submit-args=<args>
//! ```

use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::builder::JobSpec;
use crate::conf::{CONF_FLAG, SPARK_PACKAGE_NAME};
use crate::error::{ClusterError, ClusterResult};

/// Operations the driver needs from the cluster.
///
/// All calls block until the cluster answers.
pub trait Cluster {
    /// Install the CLI subcommand for `package`. Must be idempotent.
    fn install_cli(&mut self, package: &str) -> ClusterResult<()>;

    /// Resolve the `host:port` addresses of a named service endpoint.
    fn resolve_endpoints(
        &mut self,
        package: &str,
        service: &str,
        endpoint: &str,
    ) -> ClusterResult<Vec<String>>;

    /// Submit a job to its dispatcher and return the submission id.
    fn submit(&mut self, job: &JobSpec) -> ClusterResult<String>;
}

static SUBMISSION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Submission id: (\S+)").expect("submission id pattern is valid"));

#[derive(Debug, Deserialize)]
struct EndpointsResponse {
    dns: Vec<String>,
}

/// [`Cluster`] backed by the cluster CLI binary.
#[derive(Debug, Clone)]
pub struct DcosCluster {
    binary: PathBuf,
}

impl DcosCluster {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run the CLI and return stdout, or a description of the failure.
    fn run(&self, args: &[String]) -> Result<String, String> {
        debug!(cli = %self.binary.display(), ?args, "running cluster CLI");
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{} ({})", output.status, stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Cluster for DcosCluster {
    fn install_cli(&mut self, package: &str) -> ClusterResult<()> {
        self.run(&install_args(package))
            .map(|_| ())
            .map_err(|reason| ClusterError::InstallFailed {
                package: package.to_string(),
                reason,
            })
    }

    fn resolve_endpoints(
        &mut self,
        package: &str,
        service: &str,
        endpoint: &str,
    ) -> ClusterResult<Vec<String>> {
        self.run(&endpoints_args(package, service, endpoint))
            .and_then(|stdout| parse_endpoints(&stdout))
            .map_err(|reason| ClusterError::EndpointResolveFailed {
                package: package.to_string(),
                service: service.to_string(),
                endpoint: endpoint.to_string(),
                reason,
            })
    }

    fn submit(&mut self, job: &JobSpec) -> ClusterResult<String> {
        self.run(&submit_args(job))
            .and_then(|stdout| {
                parse_submission_id(&stdout)
                    .ok_or_else(|| format!("no submission id in output: {}", stdout.trim()))
            })
            .map_err(|reason| ClusterError::SubmitFailed {
                dispatcher: job.dispatcher.clone(),
                reason,
            })
    }
}

pub fn install_args(package: &str) -> Vec<String> {
    ["package", "install", package, "--yes", "--cli"]
        .map(String::from)
        .into()
}

pub fn endpoints_args(package: &str, service: &str, endpoint: &str) -> Vec<String> {
    vec![
        package.to_string(),
        format!("--name={service}"),
        "endpoints".to_string(),
        endpoint.to_string(),
    ]
}

/// CLI arguments for a submission.
///
/// The submit-args string is the framework arguments, the driver role, the
/// application archive and the application arguments, space-separated.
pub fn submit_args(job: &JobSpec) -> Vec<String> {
    let mut parts = job.submit_args.clone();
    parts.push(CONF_FLAG.to_string());
    parts.push(format!("spark.mesos.role={}", job.executor_role));
    parts.push(job.app_url.clone());
    parts.extend(job.app_args.iter().cloned());

    vec![
        SPARK_PACKAGE_NAME.to_string(),
        format!("--name={}", job.dispatcher),
        "run".to_string(),
        format!("--submit-args={}", parts.join(" ")),
    ]
}

pub fn parse_endpoints(stdout: &str) -> Result<Vec<String>, String> {
    serde_json::from_str::<EndpointsResponse>(stdout)
        .map(|r| r.dns)
        .map_err(|e| format!("unexpected endpoints output: {e}"))
}

pub fn parse_submission_id(stdout: &str) -> Option<String> {
    SUBMISSION_ID
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
