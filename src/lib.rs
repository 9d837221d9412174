//! Request distribution core of a load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!     submit(draft)
//!     ─────────────▶ ┌──────────┐    ┌──────────────┐
//!                    │  Router  │───▶│ Distributor  │  round robin over registered backends
//!                    └────┬─────┘    └──────┬───────┘
//!                         │                 │ backend (or NotAvailable → failed outcome)
//!                         ▼                 ▼
//!                    ┌──────────┐    ┌──────────────┐    ┌──────────────────────────────┐
//!                    │observers │    │   Backend    │───▶│ Pipeline: auth → log → valid │
//!                    │log,metric│    │ request log  │    └──────────────────────────────┘
//!                    └──────────┘    └──────┬───────┘
//!     Outcome                               │
//!     ◀─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod observer;
pub mod pipeline;
pub mod request;
pub mod routing;
pub mod simulation;

pub use config::DistributorConfig;
pub use error::{DistributorError, DistributorResult};
pub use load_balancer::{Backend, BackendInfo, BackendStatus, Distributor};
pub use observer::{LogObserver, MetricsObserver, MetricsSnapshot, Observer, ObserverError};
pub use pipeline::{Pipeline, Stage, StageKind};
pub use request::{Marker, Method, Request, RequestDraft, RequestId};
pub use routing::{FailureReason, Outcome, Router};
