//! Distributor error types.

use thiserror::Error;

/// Errors reported by distributor setup operations.
///
/// Running out of backends is not an error: it is reported as a failed
/// [`Outcome`](crate::routing::Outcome).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DistributorError {
    /// A backend with this id is already registered.
    #[error("backend '{0}' is already registered")]
    DuplicateBackend(String),

    /// Configuration could not be turned into a router.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for distributor operations.
pub type DistributorResult<T> = Result<T, DistributorError>;
