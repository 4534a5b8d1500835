//! Duplicate-issue guard for external enhancement calls
//!
//! Tracks when each (narrative, context) key last triggered an external call
//! and flags re-issues inside the protection window. The pipeline answers
//! flagged keys from the in-flight call or the cache instead of re-issuing.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

use super::cache::Clock;

/// Per-key cooldown tracker.
pub struct DuplicateGuard {
    window: Duration,
    clock: Arc<dyn Clock>,
    last_issued: HashMap<String, Instant>,
}

impl DuplicateGuard {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            clock,
            last_issued: HashMap::new(),
        }
    }

    /// True when a call for this key was issued inside the window.
    pub fn recently_issued(&self, key: &str) -> bool {
        match self.last_issued.get(key) {
            None => false,
            Some(at) => self.clock.now().duration_since(*at) < self.window,
        }
    }

    /// Record that a call for this key was just issued.
    pub fn record(&mut self, key: &str) {
        let now = self.clock.now();
        self.last_issued.insert(key.to_string(), now);
        // Drop stale entries so the map tracks the working set, not history
        let window = self.window;
        self.last_issued
            .retain(|_, at| now.duration_since(*at) < window);
    }
}
