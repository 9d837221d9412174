//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the distributor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::load_balancer::backend::DEFAULT_LOG_CAPACITY;
use crate::observer::ObserverKind;
use crate::pipeline::StageKind;
use crate::request::Method;

/// Root configuration for the distributor.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DistributorConfig {
    /// Backend set.
    pub backends: BackendsConfig,

    /// Pipeline stage order.
    pub pipeline: PipelineConfig,

    /// Observers attached to the router.
    pub observers: ObserversConfig,

    /// Completed-request history kept by the router.
    pub history: HistoryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request generator used by the `run` command.
    pub simulation: SimulationConfig,
}

impl DistributorConfig {
    /// Backend ids in registration order: the explicit list when given,
    /// otherwise `count` generated ids (`Server-1`, `Server-2`, ...).
    pub fn backend_ids(&self) -> Vec<String> {
        if !self.backends.ids.is_empty() {
            return self.backends.ids.clone();
        }
        (1..=self.backends.count)
            .map(|i| format!("{}{}", self.backends.id_prefix, i))
            .collect()
    }
}

/// Backend set configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendsConfig {
    /// Number of backends to generate when `ids` is empty.
    pub count: usize,

    /// Prefix for generated ids.
    pub id_prefix: String,

    /// Explicit backend ids, in registration order.
    pub ids: Vec<String>,

    /// Completed requests each backend remembers.
    pub log_capacity: usize,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            count: 4,
            id_prefix: "Server-".to_string(),
            ids: Vec::new(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stages in execution order.
    pub stages: Vec<StageKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: StageKind::STANDARD.to_vec(),
        }
    }
}

/// Observer configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObserversConfig {
    /// Observers in notification order.
    pub enabled: Vec<ObserverKind>,
}

impl Default for ObserversConfig {
    fn default() -> Self {
        Self {
            enabled: vec![ObserverKind::Log, ObserverKind::Metrics],
        }
    }
}

/// Router history configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum completed outcomes kept in memory.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the Prometheus metrics recorder.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// Simulated traffic configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay between generated requests in milliseconds.
    pub interval_ms: u64,

    /// How often the driver polls the metrics snapshot, in milliseconds.
    pub metrics_poll_ms: u64,

    /// Methods to pick from.
    pub methods: Vec<Method>,

    /// Paths to pick from.
    pub paths: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            metrics_poll_ms: 1000,
            methods: Method::ALL.to_vec(),
            paths: ["/users", "/products", "/orders", "/auth"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
