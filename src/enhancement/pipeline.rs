//! Enhancement Pipeline - debounce, cache, dedup and timeout around the
//! external text-enhancement call
//!
//! ## State machine
//!
//! `Idle -> Debouncing -> Validating -> {Resolved | TimedOut | Failed}`
//!
//! - A new narrative arms a 500 ms debounce timer that resets on every new
//!   trigger; only the last trigger in the window proceeds.
//! - On fire the TTL cache is consulted; a hit resolves immediately with
//!   `cached = true`.
//! - On a miss the duplicate guard joins a recently-issued key onto the
//!   in-flight call instead of re-issuing. At most one external call is in
//!   flight per key; all waiters converge on the first caller's outcome.
//! - The call runs under a hard 10 s timeout. Timeouts resolve to a fixed
//!   apology string; errors and invalid responses resolve to the original
//!   narrative with a reason code. Every outcome is cached, fallbacks
//!   included, so a flapping service is not hammered.
//!
//! The actor owns all mutable state (cache, guard, in-flight map); callers
//! interact through a cloneable handle, so no locking is needed anywhere.
//! Both timers are plain tokio timers that die with the actor; cancelling the
//! shutdown token tears everything down without leaks.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cache::{Clock, TtlCache};
use super::client::{EnhancementClient, EnhancementError};
use super::guard::DuplicateGuard;
use crate::config::EnhancementConfig;
use crate::types::{ConditionsSnapshot, EnhancementResult, FallbackReason};

/// Fixed apology shown when the external call exceeds the hard timeout.
pub const TIMEOUT_FALLBACK_TEXT: &str =
    "🤖 Surf robot brain freeze — the report took too long. Trust your eyes and check the cam.";

/// Timing and validation knobs lifted out of the site config.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub debounce: Duration,
    pub duplicate_window: Duration,
    pub call_timeout: Duration,
    pub cache_ttl: Duration,
    pub min_response_chars: usize,
    pub max_response_chars: usize,
    pub max_growth_factor: f64,
}

impl From<&EnhancementConfig> for PipelineSettings {
    fn from(cfg: &EnhancementConfig) -> Self {
        Self {
            debounce: Duration::from_millis(cfg.debounce_ms),
            duplicate_window: Duration::from_millis(cfg.duplicate_window_ms),
            call_timeout: Duration::from_secs(cfg.timeout_secs),
            cache_ttl: Duration::from_secs(cfg.cache_ttl_secs),
            min_response_chars: cfg.min_response_chars,
            max_response_chars: cfg.max_response_chars,
            max_growth_factor: cfg.max_growth_factor,
        }
    }
}

/// Deterministic cache/dedup key over the narrative and its numeric context.
pub fn cache_key(narrative: &str, snapshot: &ConditionsSnapshot) -> String {
    let context = serde_json::to_string(snapshot).unwrap_or_default();
    format!("{:x}", md5::compute(format!("{narrative}|{context}")))
}

// ============================================================================
// Commands and handle
// ============================================================================

enum Command {
    Submit {
        narrative: String,
        snapshot: ConditionsSnapshot,
        respond_to: oneshot::Sender<EnhancementResult>,
    },
    CallFinished {
        key: String,
        outcome: EnhancementResult,
    },
}

/// The pipeline actor is gone; the caller should fall back to its own text.
#[derive(Debug, thiserror::Error)]
#[error("enhancement pipeline stopped")]
pub struct PipelineClosed;

/// Cloneable handle to the pipeline actor.
#[derive(Clone)]
pub struct EnhancementHandle {
    tx: mpsc::Sender<Command>,
    validating_rx: watch::Receiver<bool>,
}

impl EnhancementHandle {
    /// Submit a narrative for enhancement and wait for the resolved outcome.
    pub async fn submit(
        &self,
        narrative: String,
        snapshot: ConditionsSnapshot,
    ) -> Result<EnhancementResult, PipelineClosed> {
        let (respond_to, response_rx) = oneshot::channel();
        self.tx
            .send(Command::Submit {
                narrative,
                snapshot,
                respond_to,
            })
            .await
            .map_err(|_| PipelineClosed)?;
        response_rx.await.map_err(|_| PipelineClosed)
    }

    /// True while a trigger is debouncing or an external call is in flight.
    pub fn is_validating(&self) -> bool {
        *self.validating_rx.borrow()
    }

    /// Watchable form of the validating flag for the presentation boundary.
    pub fn validating_flag(&self) -> watch::Receiver<bool> {
        self.validating_rx.clone()
    }
}

// ============================================================================
// Actor
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Idle,
    Debouncing,
    Validating,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Debouncing => "debouncing",
            Self::Validating => "validating",
        };
        write!(f, "{s}")
    }
}

struct PendingTrigger {
    key: String,
    narrative: String,
    snapshot: ConditionsSnapshot,
    waiters: Vec<oneshot::Sender<EnhancementResult>>,
    deadline: Instant,
}

struct InFlightCall {
    waiters: Vec<oneshot::Sender<EnhancementResult>>,
}

/// The pipeline actor. Construct with [`EnhancementPipeline::new`] and drive
/// with [`EnhancementPipeline::run`] on a task.
pub struct EnhancementPipeline {
    rx: mpsc::Receiver<Command>,
    self_tx: mpsc::Sender<Command>,
    client: Arc<dyn EnhancementClient>,
    settings: PipelineSettings,
    cache: TtlCache,
    guard: DuplicateGuard,
    pending: Option<PendingTrigger>,
    in_flight: HashMap<String, InFlightCall>,
    state: PipelineState,
    validating_tx: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl EnhancementPipeline {
    pub fn new(
        client: Arc<dyn EnhancementClient>,
        settings: PipelineSettings,
        clock: Arc<dyn Clock>,
        shutdown: CancellationToken,
    ) -> (Self, EnhancementHandle) {
        let (tx, rx) = mpsc::channel(64);
        let (validating_tx, validating_rx) = watch::channel(false);

        let pipeline = Self {
            rx,
            self_tx: tx.clone(),
            client,
            cache: TtlCache::new(settings.cache_ttl, Arc::clone(&clock)),
            guard: DuplicateGuard::new(settings.duplicate_window, clock),
            settings,
            pending: None,
            in_flight: HashMap::new(),
            state: PipelineState::Idle,
            validating_tx,
            shutdown,
        };
        let handle = EnhancementHandle { tx, validating_rx };
        (pipeline, handle)
    }

    /// Run the actor loop until shutdown or all handles drop.
    pub async fn run(mut self) {
        info!("EnhancementPipeline starting");

        loop {
            let deadline = self.pending.as_ref().map(|p| p.deadline);
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("EnhancementPipeline shutting down");
                    break;
                }
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                // Debounce timer: armed only while a trigger is pending
                () = time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    self.fire_debounce();
                }
            }
        }

        info!("EnhancementPipeline stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit {
                narrative,
                snapshot,
                respond_to,
            } => self.handle_submit(narrative, snapshot, respond_to),
            Command::CallFinished { key, outcome } => self.handle_call_finished(key, outcome),
        }
    }

    fn handle_submit(
        &mut self,
        narrative: String,
        snapshot: ConditionsSnapshot,
        respond_to: oneshot::Sender<EnhancementResult>,
    ) {
        let key = cache_key(&narrative, &snapshot);

        // Re-submitting a resolved narrative is a cache hit, not a new call.
        // Every outcome lands in the cache, so this lookup also covers the
        // "unchanged since the last successful enhancement" case.
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "Cache hit on submit");
            let _ = respond_to.send(hit.as_cached());
            return;
        }

        // Converge on the in-flight call for this key
        if let Some(call) = self.in_flight.get_mut(&key) {
            debug!(key = %key, "Joining in-flight call");
            call.waiters.push(respond_to);
            return;
        }

        let deadline = Instant::now() + self.settings.debounce;
        let same_key = self.pending.as_ref().is_some_and(|p| p.key == key);
        if same_key {
            // Same trigger again: extend the window, collect the waiter
            if let Some(p) = self.pending.as_mut() {
                p.waiters.push(respond_to);
                p.deadline = deadline;
                debug!(key = %key, "Debounce window extended");
            }
        } else {
            // A different trigger absorbs the old one: last one wins
            if let Some(old) = self.pending.take() {
                debug!(key = %old.key, "Pending trigger superseded");
                let fallback =
                    EnhancementResult::fallback(old.narrative, FallbackReason::Superseded);
                for waiter in old.waiters {
                    let _ = waiter.send(fallback.clone());
                }
            } else {
                debug!(key = %key, "Debounce armed");
            }
            self.pending = Some(PendingTrigger {
                key,
                narrative,
                snapshot,
                waiters: vec![respond_to],
                deadline,
            });
        }
        self.update_status();
    }

    /// Debounce timer fired: the surviving trigger moves to validation.
    fn fire_debounce(&mut self) {
        let Some(trigger) = self.pending.take() else {
            return;
        };

        // The cache may have filled while we were debouncing
        if let Some(hit) = self.cache.get(&trigger.key) {
            debug!(key = %trigger.key, "Cache hit on debounce fire");
            let cached = hit.as_cached();
            for waiter in trigger.waiters {
                let _ = waiter.send(cached.clone());
            }
            self.update_status();
            return;
        }

        // Duplicate protection: a key issued moments ago rides the existing
        // call instead of spawning another one
        if self.guard.recently_issued(&trigger.key) {
            if let Some(call) = self.in_flight.get_mut(&trigger.key) {
                debug!(key = %trigger.key, "Duplicate within window — joining in-flight call");
                call.waiters.extend(trigger.waiters);
                self.update_status();
                return;
            }
            // Recently issued but neither cached nor in flight (TTL raced out):
            // fall through and issue a fresh call
        }

        self.guard.record(&trigger.key);
        self.launch_call(trigger);
        self.update_status();
    }

    fn launch_call(&mut self, trigger: PendingTrigger) {
        info!(
            key = %trigger.key,
            narrative_len = trigger.narrative.len(),
            "Issuing enhancement call"
        );

        let key = trigger.key.clone();
        let narrative = trigger.narrative;
        self.in_flight.insert(
            key.clone(),
            InFlightCall {
                waiters: trigger.waiters,
            },
        );

        let client = Arc::clone(&self.client);
        let settings = self.settings.clone();
        let snapshot = trigger.snapshot;
        let tx = self.self_tx.clone();
        let token = self.shutdown.child_token();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                // Teardown: drop the call without reporting; waiters unwind
                // with the actor
                () = token.cancelled() => return,
                result = time::timeout(
                    settings.call_timeout,
                    client.enhance(&narrative, &snapshot),
                ) => match result {
                    Err(_elapsed) => {
                        warn!(
                            key = %key,
                            timeout_secs = settings.call_timeout.as_secs(),
                            "Enhancement call timed out"
                        );
                        EnhancementResult::fallback(
                            TIMEOUT_FALLBACK_TEXT.to_string(),
                            FallbackReason::Timeout,
                        )
                    }
                    Ok(Ok(text)) => validate_response(text, &narrative, &settings),
                    Ok(Err(e)) => {
                        let reason = reason_for(&e);
                        warn!(key = %key, error = %e, "Enhancement failed — falling back");
                        EnhancementResult::fallback(narrative, reason)
                    }
                },
            };
            let _ = tx.send(Command::CallFinished { key, outcome }).await;
        });
    }

    fn handle_call_finished(&mut self, key: String, outcome: EnhancementResult) {
        // Cache everything, fallbacks included
        self.cache.insert(key.clone(), outcome.clone());

        if let Some(call) = self.in_flight.remove(&key) {
            info!(
                key = %key,
                enhanced = outcome.was_enhanced,
                reason = ?outcome.reason,
                waiters = call.waiters.len(),
                "Enhancement resolved"
            );
            for waiter in call.waiters {
                let _ = waiter.send(outcome.clone());
            }
        }
        self.update_status();
    }

    fn update_status(&mut self) {
        let state = if self.pending.is_some() {
            PipelineState::Debouncing
        } else if self.in_flight.is_empty() {
            PipelineState::Idle
        } else {
            PipelineState::Validating
        };
        if state != self.state {
            debug!(from = %self.state, to = %state, "Pipeline state change");
            self.state = state;
        }
        let _ = self
            .validating_tx
            .send_replace(state != PipelineState::Idle);
    }
}

/// Sanity-check the service's text before accepting it.
fn validate_response(
    text: String,
    original: &str,
    settings: &PipelineSettings,
) -> EnhancementResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return EnhancementResult::fallback(
            original.to_string(),
            FallbackReason::EmptyResponse,
        );
    }
    let too_long = trimmed.len() > settings.max_response_chars
        || trimmed.len() as f64 > original.len() as f64 * settings.max_growth_factor;
    if trimmed.len() < settings.min_response_chars || too_long {
        warn!(
            input_len = original.len(),
            output_len = trimmed.len(),
            "Enhanced text outside length bounds — using original"
        );
        return EnhancementResult::fallback(
            original.to_string(),
            FallbackReason::InvalidLength,
        );
    }
    EnhancementResult::enhanced(trimmed.to_string())
}

fn reason_for(error: &EnhancementError) -> FallbackReason {
    match error {
        EnhancementError::NotConfigured => FallbackReason::NotConfigured,
        EnhancementError::Transport(_) => FallbackReason::Network,
        EnhancementError::Status(_) => FallbackReason::ServiceError,
        EnhancementError::Empty => FallbackReason::EmptyResponse,
        EnhancementError::Malformed(_) => FallbackReason::ServiceError,
    }
}

// ============================================================================
// Tests
// ============================================================================
