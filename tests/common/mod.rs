//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use request_distributor::{
    Backend, MetricsObserver, Observer, ObserverError, Pipeline, Request, Router,
};

/// Build a router with `Server-1..=Server-n`, the standard pipeline and a metrics observer.
pub fn router_with_backends(n: usize) -> (Router, Arc<MetricsObserver>) {
    let metrics = Arc::new(MetricsObserver::new());
    let router = Router::new(Pipeline::standard()).with_metrics(metrics.clone());
    for i in 1..=n {
        router.register_backend(format!("Server-{}", i)).unwrap();
    }
    (router, metrics)
}

/// A notification seen by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub observer: &'static str,
    pub request_id: String,
    pub backend: String,
}

/// Appends every notification to a log shared between observers.
pub struct RecordingObserver {
    name: &'static str,
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingObserver {
    pub fn new(name: &'static str, log: Arc<Mutex<Vec<Notification>>>) -> Self {
        Self { name, log }
    }
}

impl Observer for RecordingObserver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_distributed(&self, request: &Request, backend: &Backend) -> Result<(), ObserverError> {
        self.log.lock().unwrap().push(Notification {
            observer: self.name,
            request_id: request.id.to_string(),
            backend: backend.id().to_string(),
        });
        Ok(())
    }
}

/// Fails every notification.
pub struct FailingObserver;

impl Observer for FailingObserver {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn on_distributed(&self, _: &Request, _: &Backend) -> Result<(), ObserverError> {
        Err(ObserverError::faulted("failing", "injected failure"))
    }
}
