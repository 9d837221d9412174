//! Per-backend distribution counters.
//!
//! # Responsibilities
//! - Count distributed requests per backend id
//! - Hand out immutable snapshots for pollers
//! - Mirror counts into the `metrics` facade

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::load_balancer::Backend;
use crate::observability::metrics;
use crate::observer::{Observer, ObserverError};
use crate::request::Request;

/// Counts requests per backend. Increments are atomic per backend id.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    counts: DashMap<String, u64>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current counts.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counts = self
            .counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        MetricsSnapshot { counts }
    }
}

impl Observer for MetricsObserver {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn on_distributed(&self, _request: &Request, backend: &Backend) -> Result<(), ObserverError> {
        let count = {
            let mut entry = self.counts.entry(backend.id().to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        metrics::record_distribution(backend.id());
        tracing::debug!(backend = %backend.id(), requests = count, "Metrics updated");
        Ok(())
    }
}

/// Immutable view of per-backend request counts, ordered by backend id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsSnapshot {
    counts: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    pub fn count(&self, backend: &str) -> u64 {
        self.counts.get(backend).copied().unwrap_or(0)
    }

    /// Sum over all backends.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Percentage of all requests that went to `backend`; 0.0 when nothing was counted.
    pub fn share(&self, backend: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(backend) as f64 * 100.0 / total as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, u64> {
        self.counts
    }
}
