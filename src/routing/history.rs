//! Bounded history of completed submissions.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::observability::metrics;
use crate::routing::Outcome;

/// Keeps the most recent completed outcomes, evicting the oldest.
#[derive(Debug)]
pub struct RequestHistory {
    entries: Mutex<VecDeque<Outcome>>,
    capacity: usize,
}

impl RequestHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    pub fn push(&self, outcome: Outcome) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(outcome);
        metrics::record_history_size(entries.len());
    }

    /// Entries, newest first.
    pub fn recent(&self) -> Vec<Outcome> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, Request, RequestDraft};

    fn completed(id: &str) -> Outcome {
        Outcome::Completed {
            backend: "b".to_string(),
            request: Request::from_draft(RequestDraft::new(Method::Get, "/").with_id(id)),
        }
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let history = RequestHistory::new(2);
        for id in ["1", "2", "3"] {
            history.push(completed(id));
        }

        let ids: Vec<_> = history
            .recent()
            .iter()
            .map(|o| o.request().unwrap().id.to_string())
            .collect();
        assert_eq!(ids, vec!["3", "2"]);
        assert_eq!(history.len(), 2);
    }
}
