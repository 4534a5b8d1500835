//! Surfsense: Surf Conditions Intelligence
//!
//! Condition scoring engine and narrative enhancement pipeline for a single
//! surf spot.
//!
//! ## Architecture
//!
//! - **Analysis**: pure per-factor analyzers (wind, swell, tide) and the
//!   weighted aggregator with its override rules
//! - **Narrative**: template-based summary generation with an injected
//!   variant selector
//! - **Enhancement**: debounce -> cache -> dedup -> timeout orchestration
//!   around the external text-enhancement service
//! - **Prediction**: optional external numeric prediction, normalized at the
//!   boundary and blended into the verdict

pub mod acquisition;
pub mod analysis;
pub mod api;
pub mod config;
pub mod enhancement;
pub mod evaluation;
pub mod narrative;
pub mod prediction;
pub mod types;

// Re-export site configuration
pub use config::SiteConfig;

// Re-export commonly used types
pub use types::{
    ConditionsSnapshot, EnhancementResult, FallbackReason, OverallTier, OverallVerdict,
    Prediction, QualityTier, SwellAnalysis, SwellReading, TideAnalysis, TideDirection, TideKind,
    TidePrediction, TideSeries, WindAnalysis, WindReading,
};

// Re-export the scoring entry points
pub use analysis::aggregate;

// Re-export pipeline components
pub use enhancement::{
    EnhancementHandle, EnhancementPipeline, HttpEnhancementClient, PipelineSettings,
    TIMEOUT_FALLBACK_TEXT,
};

// Re-export the evaluation coordinator
pub use evaluation::{ConditionsReport, Evaluator, SharedReport};

// Re-export narrative generation
pub use narrative::{FixedSelector, NarrativeGenerator, RandomSelector, TemplateSelector};
