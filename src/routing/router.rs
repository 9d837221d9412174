//! Request submission and dispatch.
//!
//! # Responsibilities
//! - Own the distributor, the shared pipeline and the observer list
//! - Run every submission as select → notify → process
//! - Serve metrics snapshots and backend listings to pollers
//!
//! # Design Decisions
//! - No global instance: construct one router per distribution domain and share it by `Arc`
//! - Unavailability short-circuits before any side effect
//! - Observer errors are isolated: logged, counted, never propagated

use std::fmt;
use std::sync::Arc;

use crate::config::{validate_config, DistributorConfig};
use crate::error::{DistributorError, DistributorResult};
use crate::load_balancer::backend::DEFAULT_LOG_CAPACITY;
use crate::load_balancer::{Backend, BackendInfo, Distributor};
use crate::observability::metrics;
use crate::observer::{BuiltObserver, MetricsObserver, MetricsSnapshot, Observer};
use crate::pipeline::Pipeline;
use crate::request::{Request, RequestDraft};
use crate::routing::history::RequestHistory;
use crate::routing::outcome::{FailureReason, Outcome};

/// Default number of completed outcomes the router remembers.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Composition root and single entry point for submissions.
pub struct Router {
    distributor: Distributor,
    pipeline: Arc<Pipeline>,
    observers: Vec<Arc<dyn Observer>>,
    metrics: Option<Arc<MetricsObserver>>,
    history: RequestHistory,
    log_capacity: usize,
}

impl Router {
    /// Create a router with no backends and no observers.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            distributor: Distributor::new(),
            pipeline: Arc::new(pipeline),
            observers: Vec::new(),
            metrics: None,
            history: RequestHistory::new(DEFAULT_HISTORY_CAPACITY),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }

    /// Request log capacity for backends registered afterwards.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = RequestHistory::new(capacity);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn with_metrics(mut self, observer: Arc<MetricsObserver>) -> Self {
        self.attach_metrics(observer);
        self
    }

    /// Validate `config` and build a router from it.
    pub fn from_config(config: &DistributorConfig) -> DistributorResult<Self> {
        validate_config(config).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            DistributorError::InvalidConfig(messages.join(", "))
        })?;

        let mut router = Router::new(Pipeline::from_kinds(&config.pipeline.stages))
            .with_log_capacity(config.backends.log_capacity)
            .with_history_capacity(config.history.capacity);

        for kind in &config.observers.enabled {
            match kind.build() {
                BuiltObserver::Metrics(observer) => router.attach_metrics(observer),
                other => router.add_observer(other.into_dyn()),
            }
        }

        for id in config.backend_ids() {
            router.register_backend(id)?;
        }

        tracing::info!(
            backends = router.distributor.len(),
            stages = ?router.pipeline.stage_names(),
            observers = router.observers.len(),
            "Router initialized"
        );
        Ok(router)
    }

    /// Append an observer. Notification order is registration order.
    pub fn add_observer(&mut self, observer: Arc<dyn Observer>) {
        tracing::debug!(
            observer = observer.name(),
            position = self.observers.len(),
            "Observer attached"
        );
        self.observers.push(observer);
    }

    /// Append a metrics observer and use it for [`Router::snapshot_metrics`].
    ///
    /// When several are attached, snapshots come from the first one.
    pub fn attach_metrics(&mut self, observer: Arc<MetricsObserver>) {
        if self.metrics.is_none() {
            self.metrics = Some(observer.clone());
        }
        self.add_observer(observer);
    }

    /// Create a backend sharing this router's pipeline and register it.
    pub fn register_backend(&self, id: impl Into<String>) -> DistributorResult<Arc<Backend>> {
        let backend = Arc::new(Backend::with_log_capacity(
            id,
            self.pipeline.clone(),
            self.log_capacity,
        ));
        self.distributor.register(backend.clone())?;
        Ok(backend)
    }

    /// Distribute one request.
    pub fn submit(&self, draft: RequestDraft) -> Outcome {
        let request = Request::from_draft(draft);
        let _span = tracing::debug_span!("submit", request_id = %request.id).entered();

        let Some(backend) = self.distributor.next() else {
            tracing::warn!(path = %request.path, "No backends available");
            metrics::record_unavailable();
            return Outcome::Failed {
                reason: FailureReason::NoBackendsAvailable,
            };
        };

        self.notify(&request, &backend);

        let outcome = backend.accept(request);
        self.history.push(outcome.clone());
        outcome
    }

    fn notify(&self, request: &Request, backend: &Backend) {
        for observer in &self.observers {
            if let Err(e) = observer.on_distributed(request, backend) {
                tracing::warn!(
                    observer = observer.name(),
                    request_id = %request.id,
                    backend = %backend.id(),
                    error = %e,
                    "Observer failed; continuing"
                );
                metrics::record_observer_fault(observer.name());
            }
        }
    }

    /// Per-backend counts from the attached metrics observer; empty when none is attached.
    pub fn snapshot_metrics(&self) -> MetricsSnapshot {
        self.metrics
            .as_ref()
            .map(|m| m.snapshot())
            .unwrap_or_default()
    }

    /// Backends in registration order.
    pub fn list_backends(&self) -> Vec<BackendInfo> {
        self.distributor
            .backends()
            .iter()
            .map(|b| b.info())
            .collect()
    }

    pub fn backend(&self, id: &str) -> Option<Arc<Backend>> {
        self.distributor.get(id)
    }

    /// Completed outcomes, newest first.
    pub fn history(&self) -> Vec<Outcome> {
        self.history.recent()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observers: Vec<_> = self.observers.iter().map(|o| o.name()).collect();
        f.debug_struct("Router")
            .field("distributor", &self.distributor)
            .field("pipeline", &self.pipeline)
            .field("observers", &observers)
            .finish()
    }
}
