//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router / pipeline stages / observers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus exposition text (rendered by the CLI on request)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`request_id`, `backend`, `stage`) on every event
//! - Metrics are cheap; recording without a recorder installed is a no-op

pub mod logging;
pub mod metrics;
