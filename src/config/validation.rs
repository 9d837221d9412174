//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject duplicate backend ids, stages and observers
//! - Validate value ranges (capacities and intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DistributorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::DistributorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateBackendId(String),
    EmptyBackendId,
    ZeroLogCapacity,
    ZeroHistoryCapacity,
    DuplicateStage(String),
    DuplicateObserver(String),
    EmptyMethods,
    EmptyPaths,
    ZeroInterval(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateBackendId(id) => {
                write!(f, "backend id '{}' is listed twice", id)
            }
            ValidationError::EmptyBackendId => write!(f, "backend ids must not be empty"),
            ValidationError::ZeroLogCapacity => write!(f, "backends.log_capacity must be > 0"),
            ValidationError::ZeroHistoryCapacity => write!(f, "history.capacity must be > 0"),
            ValidationError::DuplicateStage(stage) => {
                write!(f, "pipeline stage '{}' is listed twice", stage)
            }
            ValidationError::DuplicateObserver(kind) => {
                write!(f, "observer '{}' is listed twice", kind)
            }
            ValidationError::EmptyMethods => write!(f, "simulation.methods must not be empty"),
            ValidationError::EmptyPaths => write!(f, "simulation.paths must not be empty"),
            ValidationError::ZeroInterval(field) => write!(f, "{} must be > 0", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &DistributorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for id in config.backend_ids() {
        if id.trim().is_empty() {
            errors.push(ValidationError::EmptyBackendId);
        } else if !seen.insert(id.clone()) {
            errors.push(ValidationError::DuplicateBackendId(id));
        }
    }

    if config.backends.log_capacity == 0 {
        errors.push(ValidationError::ZeroLogCapacity);
    }
    if config.history.capacity == 0 {
        errors.push(ValidationError::ZeroHistoryCapacity);
    }

    let mut stages = HashSet::new();
    for stage in &config.pipeline.stages {
        if !stages.insert(*stage) {
            errors.push(ValidationError::DuplicateStage(stage.to_string()));
        }
    }

    let mut observers = HashSet::new();
    for kind in &config.observers.enabled {
        if !observers.insert(*kind) {
            errors.push(ValidationError::DuplicateObserver(kind.to_string()));
        }
    }

    let sim = &config.simulation;
    if sim.methods.is_empty() {
        errors.push(ValidationError::EmptyMethods);
    }
    if sim.paths.is_empty() {
        errors.push(ValidationError::EmptyPaths);
    }
    if sim.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval("simulation.interval_ms"));
    }
    if sim.metrics_poll_ms == 0 {
        errors.push(ValidationError::ZeroInterval("simulation.metrics_poll_ms"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
