//! Request values flowing through the distributor.
//!
//! # Responsibilities
//! - Carry the caller's request (id, method, path) through selection and pipeline
//! - Generate a unique request ID when the caller does not supply one
//! - Accumulate stage markers in the order stages applied them
//!
//! # Design Decisions
//! - Value semantics: stages take a `Request` by value and hand back the annotated copy
//! - Markers keep insertion order so the configured stage order is observable

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Unique identifier of a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Marker a pipeline stage sets on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Authenticated,
    Logged,
    Validated,
}

impl Marker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::Authenticated => "authenticated",
            Marker::Logged => "logged",
            Marker::Validated => "validated",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marker together with the value the stage assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub marker: Marker,
    pub value: bool,
}

/// What the caller submits. The ID is optional; one is generated when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub method: Method,
    pub path: String,
}

impl RequestDraft {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            id: None,
            method,
            path: path.into(),
        }
    }

    /// Use a caller-supplied request ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub method: Method,
    pub path: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    annotations: Vec<Annotation>,
}

impl Request {
    /// Materialize a draft, stamping it with an ID and creation time.
    pub fn from_draft(draft: RequestDraft) -> Self {
        let id = match draft.id {
            Some(id) => RequestId::from(id),
            None => RequestId::generate(),
        };
        Self {
            id,
            method: draft.method,
            path: draft.path,
            created_at: unix_millis(),
            annotations: Vec::new(),
        }
    }

    /// Return the request with `marker` set to `value`.
    ///
    /// An existing annotation for the same marker is overwritten in place;
    /// every other annotation keeps its value and position.
    pub fn annotate(mut self, marker: Marker, value: bool) -> Self {
        match self.annotations.iter_mut().find(|a| a.marker == marker) {
            Some(existing) => existing.value = value,
            None => self.annotations.push(Annotation { marker, value }),
        }
        self
    }

    /// True if the marker was set to `true` by some stage.
    pub fn is_marked(&self, marker: Marker) -> bool {
        self.annotations
            .iter()
            .any(|a| a.marker == marker && a.value)
    }

    /// Annotations in the order stages applied them.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Markers in the order stages applied them.
    pub fn markers(&self) -> impl Iterator<Item = Marker> + '_ {
        self.annotations.iter().map(|a| a.marker)
    }
}

impl From<RequestDraft> for Request {
    fn from(draft: RequestDraft) -> Self {
        Request::from_draft(draft)
    }
}

pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
