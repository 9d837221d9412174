//! Observer that logs each distribution decision.

use crate::load_balancer::Backend;
use crate::observer::{Observer, ObserverError};
use crate::request::Request;

/// Emits one `info` event per distributed request. Holds no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn name(&self) -> &'static str {
        "log"
    }

    fn on_distributed(&self, request: &Request, backend: &Backend) -> Result<(), ObserverError> {
        tracing::info!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            backend = %backend.id(),
            "Request assigned to backend"
        );
        Ok(())
    }
}
