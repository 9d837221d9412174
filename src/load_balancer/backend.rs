//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single serving node
//! - Run accepted requests through the shared pipeline
//! - Keep a bounded log of completed requests
//! - Expose an advisory status (Online/Offline/Draining) for display

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::pipeline::Pipeline;
use crate::request::Request;
use crate::routing::Outcome;

/// Default number of completed requests a backend remembers.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Backend status enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Online = 0,
    Offline = 1,
    Draining = 2,
}

impl From<u8> for BackendStatus {
    fn from(val: u8) -> Self {
        match val {
            1 => BackendStatus::Offline,
            2 => BackendStatus::Draining,
            _ => BackendStatus::Online,
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendStatus::Online => "online",
            BackendStatus::Offline => "offline",
            BackendStatus::Draining => "draining",
        };
        f.write_str(s)
    }
}

/// Display view of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub id: String,
    pub status: BackendStatus,
    /// Requests accepted since construction.
    pub handled: u64,
}

/// A single backend server.
pub struct Backend {
    id: String,
    /// Current status (0=Online, 1=Offline, 2=Draining).
    status: AtomicU8,
    pipeline: Arc<Pipeline>,
    log: Mutex<VecDeque<Request>>,
    log_capacity: usize,
    handled: AtomicU64,
}

impl Backend {
    /// Create a new backend with the default log capacity.
    pub fn new(id: impl Into<String>, pipeline: Arc<Pipeline>) -> Self {
        Self::with_log_capacity(id, pipeline, DEFAULT_LOG_CAPACITY)
    }

    /// Create a new backend remembering at most `log_capacity` requests.
    pub fn with_log_capacity(
        id: impl Into<String>,
        pipeline: Arc<Pipeline>,
        log_capacity: usize,
    ) -> Self {
        Self {
            id: id.into(),
            status: AtomicU8::new(BackendStatus::Online as u8),
            pipeline,
            log: Mutex::new(VecDeque::with_capacity(log_capacity.min(64))),
            log_capacity,
            handled: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> BackendStatus {
        BackendStatus::from(self.status.load(Ordering::Relaxed))
    }

    pub fn set_status(&self, status: BackendStatus) {
        let previous = BackendStatus::from(self.status.swap(status as u8, Ordering::Relaxed));
        if previous != status {
            tracing::info!(
                backend = %self.id,
                from = %previous,
                to = %status,
                "Backend status changed"
            );
        }
    }

    /// Run the request through the pipeline and record it.
    pub fn accept(&self, request: Request) -> Outcome {
        let processed = self.pipeline.run(request);
        self.record(processed.clone());
        self.handled.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(backend = %self.id, request_id = %processed.id, "Request processed");

        Outcome::Completed {
            backend: self.id.clone(),
            request: processed,
        }
    }

    fn record(&self, request: Request) {
        if self.log_capacity == 0 {
            return;
        }
        // Log entries are whole values, so a poisoned lock still guards a valid deque.
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        if log.len() == self.log_capacity {
            log.pop_front();
        }
        log.push_back(request);
    }

    /// Copy of the request log, oldest first.
    pub fn recent_requests(&self) -> Vec<Request> {
        let log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        log.iter().cloned().collect()
    }

    /// Number of requests accepted since construction.
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    pub fn info(&self) -> BackendInfo {
        BackendInfo {
            id: self.id.clone(),
            status: self.status(),
            handled: self.handled(),
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("id", &self.id)
            .field("status", &self.status())
            .field("handled", &self.handled())
            .finish()
    }
}
