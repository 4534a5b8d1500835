//! Narrative Enhancement Pipeline
//!
//! Orchestrates the call to the external text-enhancement service:
//!
//! - **client** - the HTTP seam (chat-completions shape) and its typed errors
//! - **cache** - TTL result cache with an injected clock
//! - **guard** - duplicate-issue protection window
//! - **pipeline** - the actor tying debounce, cache, dedup, timeout and the
//!   fallback taxonomy together
//!
//! Every failure mode degrades to the rule-based narrative; there is no
//! fatal error path in this module.

pub mod cache;
pub mod client;
pub mod guard;
pub mod pipeline;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use client::{EnhancementClient, EnhancementError, HttpEnhancementClient};
pub use guard::DuplicateGuard;
pub use pipeline::{
    cache_key, EnhancementHandle, EnhancementPipeline, PipelineClosed, PipelineSettings,
    TIMEOUT_FALLBACK_TEXT,
};
