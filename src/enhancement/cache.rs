//! TTL cache for enhancement outcomes
//!
//! An explicitly owned cache object with an injected clock, replacing the
//! usual module-global map. Entries expire lazily on read once their age
//! exceeds the TTL. Single-process, best-effort: no cross-instance
//! consistency is attempted.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

use crate::types::EnhancementResult;

/// Time source seam so tests can drive expiry without wall time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock. Under a paused tokio runtime this follows test time,
/// which is exactly what the pipeline's timer tests need.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for unit tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<std::sync::Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(std::sync::Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.lock().map(|n| *n).unwrap_or_else(|_| Instant::now())
    }
}

struct CacheEntry {
    value: EnhancementResult,
    stored_at: Instant,
}

/// Keyed store of enhancement outcomes with lazy TTL eviction.
pub struct TtlCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Look up a live entry, evicting it first if it has expired.
    pub fn get(&mut self, key: &str) -> Option<&EnhancementResult> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            if now.duration_since(entry.stored_at) >= self.ttl {
                self.entries.remove(key);
                return None;
            }
        }
        self.entries.get(key).map(|e| &e.value)
    }

    /// Store an outcome. Failure and fallback results are cached too, so a
    /// flapping external service is not hammered with retries.
    pub fn insert(&mut self, key: String, value: EnhancementResult) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CacheEntry { value, stored_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
