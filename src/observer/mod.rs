//! Distribution observers.
//!
//! # Data Flow
//! ```text
//! Distributor selects backend
//!     → Router notifies observers in registration order:
//!         - log.rs (emit a distribution event)
//!         - metrics.rs (count requests per backend)
//!     → pipeline runs
//! ```
//!
//! # Design Decisions
//! - Observers are called synchronously, before the pipeline runs
//! - An observer error never aborts distribution: the router logs and counts it
//! - Observers see the request before annotation

pub mod log;
pub mod metrics;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use self::log::LogObserver;
pub use self::metrics::{MetricsObserver, MetricsSnapshot};

use crate::load_balancer::Backend;
use crate::request::Request;

/// Error raised by an observer while handling a notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObserverError {
    #[error("observer '{observer}' failed: {message}")]
    Faulted {
        observer: &'static str,
        message: String,
    },
}

impl ObserverError {
    pub fn faulted(observer: &'static str, message: impl Into<String>) -> Self {
        ObserverError::Faulted {
            observer,
            message: message.into(),
        }
    }
}

/// Notified on every distribution decision.
pub trait Observer: Send + Sync {
    /// Observer name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Called after `backend` was selected for `request`.
    fn on_distributed(&self, request: &Request, backend: &Backend) -> Result<(), ObserverError>;
}

/// Observer kinds selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverKind {
    Log,
    Metrics,
}

impl fmt::Display for ObserverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverKind::Log => f.write_str("log"),
            ObserverKind::Metrics => f.write_str("metrics"),
        }
    }
}

/// A configured observer. The metrics variant keeps its concrete type so the
/// router can take snapshots from it.
#[derive(Clone)]
pub enum BuiltObserver {
    Log(Arc<LogObserver>),
    Metrics(Arc<MetricsObserver>),
}

impl ObserverKind {
    pub fn build(self) -> BuiltObserver {
        match self {
            ObserverKind::Log => BuiltObserver::Log(Arc::new(LogObserver::new())),
            ObserverKind::Metrics => BuiltObserver::Metrics(Arc::new(MetricsObserver::new())),
        }
    }
}

impl BuiltObserver {
    pub fn into_dyn(self) -> Arc<dyn Observer> {
        match self {
            BuiltObserver::Log(o) => o as Arc<dyn Observer>,
            BuiltObserver::Metrics(o) => o as Arc<dyn Observer>,
        }
    }
}
