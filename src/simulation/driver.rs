//! Simulated traffic driver.
//!
//! # Responsibilities
//! - Submit one generated request per tick
//! - Poll the metrics snapshot on its own interval and log the distribution
//! - Stop on shutdown or after a request limit, returning a report

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::SimulationConfig;
use crate::load_balancer::BackendInfo;
use crate::observer::MetricsSnapshot;
use crate::routing::{Outcome, Router};
use crate::simulation::generator::RequestGenerator;

/// Summary of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
    pub metrics: MetricsSnapshot,
    pub backends: Vec<BackendInfo>,
}

pub struct SimulationDriver {
    router: Arc<Router>,
    generator: RequestGenerator,
    interval: Duration,
    metrics_poll: Duration,
    max_requests: Option<u64>,
}

impl SimulationDriver {
    pub fn new(router: Arc<Router>, config: &SimulationConfig) -> Self {
        Self {
            router,
            generator: RequestGenerator::from_config(config),
            interval: Duration::from_millis(config.interval_ms.max(1)),
            metrics_poll: Duration::from_millis(config.metrics_poll_ms.max(1)),
            max_requests: None,
        }
    }

    /// Stop after `max` submissions.
    pub fn with_max_requests(mut self, max: u64) -> Self {
        self.max_requests = Some(max);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> SimulationReport {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            max_requests = ?self.max_requests,
            "Simulation starting"
        );

        let mut submit_ticker = time::interval(self.interval);
        submit_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut poll_ticker = time::interval(self.metrics_poll);
        // the first tick completes immediately; nothing to report yet
        poll_ticker.tick().await;

        let mut submitted = 0u64;
        let mut completed = 0u64;

        loop {
            if self.max_requests.is_some_and(|max| submitted >= max) {
                break;
            }

            tokio::select! {
                _ = submit_ticker.tick() => {
                    let outcome = self.router.submit(self.generator.generate());
                    submitted += 1;
                    if outcome.is_success() {
                        completed += 1;
                    }
                }
                _ = poll_ticker.tick() => {
                    log_distribution(&self.router.snapshot_metrics());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Simulation received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        let metrics = self.router.snapshot_metrics();
        log_distribution(&metrics);

        SimulationReport {
            submitted,
            completed,
            failed: submitted - completed,
            metrics,
            backends: self.router.list_backends(),
        }
    }
}

/// Submit `count` generated requests back to back.
pub fn submit_batch(router: &Router, generator: &RequestGenerator, count: usize) -> Vec<Outcome> {
    (0..count).map(|_| router.submit(generator.generate())).collect()
}

fn log_distribution(snapshot: &MetricsSnapshot) {
    for (backend, count) in snapshot.iter() {
        tracing::info!(
            backend,
            requests = count,
            share_pct = %format!("{:.1}", snapshot.share(backend)),
            "Distribution"
        );
    }
}
