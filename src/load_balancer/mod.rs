//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Router.submit
//!     → pool.rs (Distributor: load the registered backends)
//!     → Apply load balancing algorithm:
//!         - round_robin.rs (rotate through backends)
//!     → backend.rs (run pipeline, record request)
//!     → Return outcome, or NotAvailable when nothing is registered
//! ```
//!
//! # Design Decisions
//! - Selection policy behind a trait; the distributor owns the backend list
//! - Registration order is selection order
//! - Status is advisory: every registered backend is eligible

pub mod backend;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;

pub use backend::{Backend, BackendInfo, BackendStatus};
pub use pool::Distributor;
pub use round_robin::RoundRobin;

/// A backend selection policy.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Select the next backend, or `None` when the list is empty.
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>>;

    /// Policy name for logs.
    fn name(&self) -> &'static str;
}
