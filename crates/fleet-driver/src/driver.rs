//! Orchestration driver.
//!
//! Phases, strictly in order:
//!
//! 1. load the inventory
//! 2. compute the topology plan and check every broker yields a topic name
//! 3. construct the dispatcher provider
//! 4. report the plan
//! 5. install broker, store and submission CLIs
//! 6. resolve store endpoints
//! 7. per broker: resolve endpoints, then submit each producer followed by
//!    its consumers, recording every submission in the ledger

use fleet_core::{BrokerCluster, Inventory};
use fleet_placement::DispatcherProvider;
use fleet_submit::conf::{BROKER_ENDPOINT, SPARK_PACKAGE_NAME, STORE_ENDPOINT};
use fleet_submit::{Cluster, ConsumerParams, JobSpec, JobSpecBuilder, ProducerParams, StoreConnection};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::RunConfig;
use crate::error::{DriverError, DriverResult};
use crate::ledger::{Submission, SubmissionLedger};
use crate::plan::{ProducerNames, TopologyPlan, normalize_name};

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub plan: TopologyPlan,
    /// Recorded submissions, in submission order.
    pub submissions: Vec<Submission>,
}

/// Load the inventory named by `config` and run the fanout.
pub fn run<C: Cluster + ?Sized>(config: &RunConfig, cluster: &mut C) -> DriverResult<RunSummary> {
    let inventory = Inventory::load(&config.dispatcher_file, &config.infrastructure_file)?;
    run_with_inventory(config, &inventory, cluster)
}

/// Run the fanout against an already-loaded inventory.
pub fn run_with_inventory<C: Cluster + ?Sized>(
    config: &RunConfig,
    inventory: &Inventory,
    cluster: &mut C,
) -> DriverResult<RunSummary> {
    let plan = TopologyPlan::new(
        inventory.brokers.len(),
        config.producers_per_broker,
        config.consumers_per_producer,
    )?;
    // Every broker must yield a topic name before anything reaches the cluster.
    for broker in &inventory.brokers {
        normalize_name(broker.service_name())?;
    }
    let mut provider =
        DispatcherProvider::with_kind(config.strategy, inventory.dispatchers.clone(), plan.num_jobs)?;

    report(&plan, inventory, &provider);

    install_clis(cluster, inventory)?;

    let store_endpoints = cluster.resolve_endpoints(
        &inventory.store.package_name,
        inventory.store.service_name(),
        STORE_ENDPOINT,
    )?;
    let store = StoreConnection::from_endpoints(&store_endpoints)?;
    debug!(hosts = ?store.hosts, port = %store.port, "store endpoints resolved");

    let mut fanout = Fanout {
        config,
        builder: JobSpecBuilder::new(&config.jar),
        store,
        ledger: SubmissionLedger::new(&config.submissions_output_file),
        submissions: Vec::new(),
    };

    for broker in &inventory.brokers {
        fanout.launch_broker(cluster, &mut provider, broker)?;
    }

    debug!(
        strategy = provider.strategy_name(),
        state = ?provider.state(),
        "dispatcher allocation finished"
    );
    info!(
        submissions = fanout.submissions.len(),
        ledger = %fanout.ledger.path().display(),
        "all jobs submitted"
    );
    Ok(RunSummary {
        plan,
        submissions: fanout.submissions,
    })
}

fn report(plan: &TopologyPlan, inventory: &Inventory, provider: &DispatcherProvider) {
    info!("Number of Kafka clusters: {}", plan.num_brokers);
    info!(
        "Number of dispatchers: {} (strategy: {})",
        inventory.dispatchers.len(),
        provider.strategy_name()
    );
    info!(
        "Total number of jobs: {} ({} producers, {} consumers)",
        plan.num_jobs, plan.num_producers, plan.num_consumers
    );
    info!(
        "Cassandra service {} ({} nodes)",
        inventory.store.service_name(),
        inventory.store.nodes.count
    );
    provider.report();
}

/// Install every package CLI the run needs, each package once.
fn install_clis<C: Cluster + ?Sized>(cluster: &mut C, inventory: &Inventory) -> DriverResult<()> {
    let mut packages: Vec<&str> = Vec::new();
    let wanted = inventory
        .brokers
        .iter()
        .map(|b| b.package_name.as_str())
        .chain([inventory.store.package_name.as_str(), SPARK_PACKAGE_NAME]);
    for package in wanted {
        if !packages.contains(&package) {
            packages.push(package);
        }
    }

    for package in packages {
        info!(package, "installing package CLI");
        cluster.install_cli(package)?;
    }
    Ok(())
}

/// Per-run state shared by every submission.
struct Fanout<'a> {
    config: &'a RunConfig,
    builder: JobSpecBuilder,
    store: StoreConnection,
    ledger: SubmissionLedger,
    submissions: Vec<Submission>,
}

impl Fanout<'_> {
    fn launch_broker<C: Cluster + ?Sized>(
        &mut self,
        cluster: &mut C,
        provider: &mut DispatcherProvider,
        broker: &BrokerCluster,
    ) -> DriverResult<()> {
        let brokers =
            cluster.resolve_endpoints(&broker.package_name, broker.service_name(), BROKER_ENDPOINT)?;
        debug!(service = %broker.service_name(), endpoints = ?brokers, "broker endpoints resolved");

        let config = self.config;
        let (producer, consumer) = (&config.producer, &config.consumer);

        for p in 0..config.producers_per_broker {
            let dispatcher = provider.provide()?.clone();
            let names = ProducerNames::derive(broker.service_name(), p)?;

            let job = self.builder.producer(&ProducerParams {
                broker_endpoints: &brokers,
                dispatcher: &dispatcher.service_name,
                executor_role: &dispatcher.executor_role,
                topic: &names.topic,
                number_of_words: producer.number_of_words,
                words_per_second: producer.words_per_second,
                resources: producer.resources,
                must_fail: producer.must_fail,
            });
            self.submit_and_record(cluster, &job)?;

            for c in 0..config.consumers_per_producer {
                let dispatcher = provider.provide()?.clone();
                let consumer_names = names.consumer(c);

                let job = self.builder.consumer(&ConsumerParams {
                    broker_endpoints: &brokers,
                    store: &self.store,
                    dispatcher: &dispatcher.service_name,
                    executor_role: &dispatcher.executor_role,
                    topic: &names.topic,
                    group_id: &consumer_names.group_id,
                    write_to_store: consumer.write_to_store,
                    batch_size_seconds: consumer.batch_size_seconds,
                    keyspace: &names.keyspace,
                    table: &consumer_names.table,
                    resources: consumer.resources,
                    must_fail: consumer.must_fail,
                });
                self.submit_and_record(cluster, &job)?;
            }
        }
        Ok(())
    }

    /// Submit `job` and append it to the ledger.
    ///
    /// A ledger failure after an accepted submission is fatal and names the
    /// orphaned submission id.
    fn submit_and_record<C: Cluster + ?Sized>(&mut self, cluster: &mut C, job: &JobSpec) -> DriverResult<()> {
        let submission_id = cluster.submit(job)?;
        info!(
            kind = ?job.kind,
            dispatcher = %job.dispatcher,
            submission_id = %submission_id,
            "job submitted"
        );

        let entry = Submission {
            dispatcher: job.dispatcher.clone(),
            submission_id,
        };
        if let Err(source) = self.ledger.append(&entry) {
            error!(
                dispatcher = %entry.dispatcher,
                submission_id = %entry.submission_id,
                ledger = %self.ledger.path().display(),
                error = %source,
                "submission accepted but NOT recorded; kill it manually"
            );
            return Err(DriverError::LedgerAppendFailed {
                dispatcher: entry.dispatcher,
                submission_id: entry.submission_id,
                path: self.ledger.path().to_path_buf(),
                source,
            });
        }

        self.submissions.push(entry);
        Ok(())
    }
}
