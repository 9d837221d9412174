//! Submission outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::request::Request;

/// Why a submission could not be completed.
///
/// Serialized with the same wording as `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// No backend is registered.
    #[serde(rename = "no backends available")]
    NoBackendsAvailable,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoBackendsAvailable => f.write_str("no backends available"),
        }
    }
}

/// Result record of a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// The request went through the pipeline on `backend`.
    Completed { backend: String, request: Request },
    /// The request was not dispatched.
    Failed { reason: FailureReason },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    pub fn backend(&self) -> Option<&str> {
        match self {
            Outcome::Completed { backend, .. } => Some(backend),
            Outcome::Failed { .. } => None,
        }
    }

    /// The fully annotated request.
    pub fn request(&self) -> Option<&Request> {
        match self {
            Outcome::Completed { request, .. } => Some(request),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Outcome::Completed { .. } => None,
            Outcome::Failed { reason } => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome() {
        let outcome = Outcome::Failed {
            reason: FailureReason::NoBackendsAvailable,
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.backend(), None);
        assert!(outcome.request().is_none());
        assert_eq!(
            outcome.reason().map(|r| r.to_string()).as_deref(),
            Some("no backends available")
        );

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "failed", "reason": "no backends available" })
        );

        let parsed: Outcome = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, outcome);
    }
}
