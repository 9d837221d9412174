//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! RequestDraft (id?, method, path)
//!     → router.rs (Router::submit)
//!     → Distributor::next → NotAvailable? → Outcome::Failed
//!     → observers notified in registration order
//!     → Backend::accept (pipeline run, request log)
//!     → history.rs (bounded record of completed outcomes)
//!     → outcome.rs (Outcome returned to caller)
//! ```
//!
//! # Design Decisions
//! - select → notify → process is a fixed order
//! - Deterministic: same registration order and call count give the same selection
//! - Reads (metrics, backends, history) return copies, never live state

pub mod history;
pub mod outcome;
pub mod router;

pub use history::RequestHistory;
pub use outcome::{FailureReason, Outcome};
pub use router::Router;
