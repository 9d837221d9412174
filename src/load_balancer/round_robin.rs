//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::{backend::Backend, LoadBalancer};

/// Round-robin selector.
/// Stores a cursor that always points inside the backend list.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next call will select, for a list of `len` backends.
    pub fn cursor(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.cursor.load(Ordering::Relaxed) % len)
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>> {
        let len = backends.len();
        if len == 0 {
            return None;
        }

        // Read and advance in one step so concurrent callers never share a slot.
        let index = match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
        {
            Ok(prev) | Err(prev) => prev % len,
        };

        backends.get(index).cloned()
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
