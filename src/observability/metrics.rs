//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define distributor metrics (distributions, failures, stage runs, observer faults)
//! - Install a Prometheus recorder whose exposition text the CLI can print
//!
//! # Metrics
//! - `distributor_requests_total` (counter): requests distributed, by backend
//! - `distributor_unavailable_total` (counter): submissions with no backend available
//! - `distributor_stage_runs_total` (counter): pipeline stage executions, by stage
//! - `distributor_observer_faults_total` (counter): isolated observer errors, by observer
//! - `distributor_history_size` (gauge): entries held in the router history
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed recorder it is a no-op
//! - No HTTP listener: the handle renders text on demand

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

pub fn record_distribution(backend: &str) {
    counter!("distributor_requests_total", "backend" => backend.to_string()).increment(1);
}

pub fn record_unavailable() {
    counter!("distributor_unavailable_total").increment(1);
}

pub fn record_stage(stage: &'static str) {
    counter!("distributor_stage_runs_total", "stage" => stage).increment(1);
}

pub fn record_observer_fault(observer: &'static str) {
    counter!("distributor_observer_faults_total", "observer" => observer).increment(1);
}

pub fn record_history_size(size: usize) {
    gauge!("distributor_history_size").set(size as f64);
}
