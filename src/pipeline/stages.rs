//! Built-in pipeline stages.
//!
//! Each stage sets a single marker on the request and records one
//! `distributor_stage_runs_total` increment. The stages are placeholders for
//! real authentication, audit logging and validation: they annotate, they do
//! not reject.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::observability::metrics;
use crate::request::{unix_millis, Marker, Request};

/// A single unit of request processing.
///
/// `process` must only add or overwrite the stage's own marker and pass
/// every earlier annotation through untouched. Stages are total: a stage that
/// needs to reject requests would return an outcome instead of a `Request`
/// and is not provided here.
pub trait Stage: Send + Sync + fmt::Debug {
    /// Stage name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Marker this stage applies.
    fn marker(&self) -> Marker;

    /// Annotate the request.
    fn process(&self, request: Request) -> Request;
}

/// Marks requests as authenticated.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthenticationStage;

impl Stage for AuthenticationStage {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn marker(&self) -> Marker {
        Marker::Authenticated
    }

    fn process(&self, request: Request) -> Request {
        tracing::debug!(request_id = %request.id, "Authenticating request");
        metrics::record_stage(self.name());
        request.annotate(self.marker(), true)
    }
}

/// Marks requests as logged, emitting an audit event with the processing time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingStage;

impl Stage for LoggingStage {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn marker(&self) -> Marker {
        Marker::Logged
    }

    fn process(&self, request: Request) -> Request {
        tracing::debug!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            timestamp_ms = unix_millis(),
            "Logging request"
        );
        metrics::record_stage(self.name());
        request.annotate(self.marker(), true)
    }
}

/// Marks requests as validated.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationStage;

impl Stage for ValidationStage {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn marker(&self) -> Marker {
        Marker::Validated
    }

    fn process(&self, request: Request) -> Request {
        tracing::debug!(request_id = %request.id, "Validating request");
        metrics::record_stage(self.name());
        request.annotate(self.marker(), true)
    }
}

/// Stage kinds selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Authentication,
    Logging,
    Validation,
}

impl StageKind {
    /// The default order: authentication, then logging, then validation.
    pub const STANDARD: [StageKind; 3] = [
        StageKind::Authentication,
        StageKind::Logging,
        StageKind::Validation,
    ];

    /// Instantiate the stage.
    pub fn build(self) -> Box<dyn Stage> {
        match self {
            StageKind::Authentication => Box::new(AuthenticationStage),
            StageKind::Logging => Box::new(LoggingStage),
            StageKind::Validation => Box::new(ValidationStage),
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Authentication => "authentication",
            StageKind::Logging => "logging",
            StageKind::Validation => "validation",
        };
        f.write_str(name)
    }
}
