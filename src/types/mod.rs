//! Shared data structures for the surf conditions pipeline
//!
//! This module defines the core types flowing through the system:
//! - Readings: normalized wind/swell/tide inputs from the acquisition boundary
//! - Analysis: per-factor analyzer outputs (tier, score, descriptive text)
//! - Verdict: the aggregator's combined grade and confidence
//! - Enhancement: narrative enhancement outcomes and fallback taxonomy

mod analysis;
mod enhancement;
mod readings;
mod verdict;

pub use analysis::*;
pub use enhancement::*;
pub use readings::*;
pub use verdict::*;
