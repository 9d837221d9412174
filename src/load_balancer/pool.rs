//! Backend pool management.
//!
//! # Responsibilities
//! - Own the registered backends in registration order
//! - Reject duplicate backend ids
//! - Apply the load balancing algorithm to select the next backend

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DistributorError, DistributorResult};
use crate::load_balancer::{backend::Backend, round_robin::RoundRobin, LoadBalancer};

/// Selects which backend handles the next request.
pub struct Distributor {
    /// Registered backends. Replaced wholesale on registration, read lock-free.
    backends: ArcSwap<Vec<Arc<Backend>>>,
    lb: Box<dyn LoadBalancer>,
}

impl Distributor {
    /// Create an empty round-robin distributor.
    pub fn new() -> Self {
        Self::with_strategy(Box::new(RoundRobin::new()))
    }

    /// Create an empty distributor with a custom selection policy.
    pub fn with_strategy(lb: Box<dyn LoadBalancer>) -> Self {
        Self {
            backends: ArcSwap::from_pointee(Vec::new()),
            lb,
        }
    }

    /// Append a backend to the selection sequence.
    pub fn register(&self, backend: Arc<Backend>) -> DistributorResult<()> {
        let mut duplicate = false;
        self.backends.rcu(|current| {
            duplicate = current.iter().any(|b| b.id() == backend.id());
            let mut next = Vec::clone(current);
            if !duplicate {
                next.push(backend.clone());
            }
            next
        });

        if duplicate {
            tracing::warn!(backend = %backend.id(), "Rejected duplicate backend registration");
            return Err(DistributorError::DuplicateBackend(backend.id().to_string()));
        }

        tracing::info!(backend = %backend.id(), position = self.len() - 1, "Backend registered");
        Ok(())
    }

    /// Select the next backend. `None` means no backend is registered.
    pub fn next(&self) -> Option<Arc<Backend>> {
        let backends = self.backends.load();
        let selected = self.lb.next_server(&backends);
        if selected.is_none() {
            tracing::debug!(strategy = self.lb.name(), "No backends registered");
        }
        selected
    }

    /// Backends in registration order.
    pub fn backends(&self) -> Vec<Arc<Backend>> {
        Vec::clone(&self.backends.load())
    }

    pub fn get(&self, id: &str) -> Option<Arc<Backend>> {
        self.backends.load().iter().find(|b| b.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.backends.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.load().is_empty()
    }
}

impl Default for Distributor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Distributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.backends.load().iter().map(|b| b.id().to_string()).collect();
        f.debug_struct("Distributor")
            .field("strategy", &self.lb.name())
            .field("backends", &ids)
            .finish()
    }
}
