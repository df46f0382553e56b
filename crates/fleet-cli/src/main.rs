use clap::Parser;
use fleet_submit::DcosCluster;
use tracing::{debug, info};

mod args;

use args::{Cli, LogFormat};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("streamfleet=info".parse()?)
        .add_directive("fleet_driver=info".parse()?)
        .add_directive("fleet_placement=info".parse()?);
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }

    let config = cli.run_config();
    debug!(config = %serde_json::to_string(&config)?, "run configuration");

    let mut cluster = DcosCluster::new(&cli.cli);
    let summary = fleet_driver::run(&config, &mut cluster)?;

    info!(
        jobs = summary.plan.num_jobs,
        recorded = summary.submissions.len(),
        ledger = %config.submissions_output_file.display(),
        "fanout complete"
    );
    Ok(())
}
