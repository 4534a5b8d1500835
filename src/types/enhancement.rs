//! Outcome types for the narrative enhancement pipeline.

use serde::{Deserialize, Serialize};

/// Why an enhancement attempt fell back to the rule-based narrative.
///
/// Every variant is a resolved, non-fatal outcome. The distinction matters
/// for logging and for the dashboard's "why am I seeing the plain report"
/// tooltip, not for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No API credentials configured - a normal deployment state
    NotConfigured,
    /// Service returned a non-success status
    ServiceError,
    /// Transport-level failure (DNS, connect, TLS, read)
    Network,
    /// Service answered with empty content
    EmptyResponse,
    /// Response length outside configured bounds or too divergent
    InvalidLength,
    /// Hard timeout fired before the service answered
    Timeout,
    /// Trigger absorbed by a newer narrative inside the debounce window
    Superseded,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotConfigured => "enhancement service not configured",
            Self::ServiceError => "enhancement service error",
            Self::Network => "enhancement service unreachable",
            Self::EmptyResponse => "service returned empty response",
            Self::InvalidLength => "response length invalid",
            Self::Timeout => "enhancement timed out",
            Self::Superseded => "superseded by a newer narrative",
        };
        write!(f, "{s}")
    }
}

/// Final displayed text plus how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub text: String,
    /// True only when the external service's text passed validation
    pub was_enhanced: bool,
    /// True when served from the pipeline's TTL cache
    pub cached: bool,
    /// Set whenever `was_enhanced` is false
    pub reason: Option<FallbackReason>,
}

impl EnhancementResult {
    pub fn enhanced(text: String) -> Self {
        Self {
            text,
            was_enhanced: true,
            cached: false,
            reason: None,
        }
    }

    pub fn fallback(text: String, reason: FallbackReason) -> Self {
        Self {
            text,
            was_enhanced: false,
            cached: false,
            reason: Some(reason),
        }
    }

    /// Same result re-served from cache.
    pub fn as_cached(&self) -> Self {
        let mut out = self.clone();
        out.cached = true;
        out
    }
}
