//! Overall verdict produced by the quality aggregator.

use serde::{Deserialize, Serialize};

/// Overall surf quality grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallTier {
    Firing,
    Epic,
    Good,
    Fair,
    Poor,
    Terrible,
}

impl std::fmt::Display for OverallTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Firing => "firing",
            Self::Epic => "epic",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Terrible => "terrible",
        };
        write!(f, "{s}")
    }
}

/// External prediction score, normalized once at the service boundary.
///
/// The canonical service scale is 0-10; `normalized` is `raw / 2` clamped to
/// [0, 5]. The aggregator blends `normalized`; the narrative displays `raw`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub raw: f64,
    pub normalized: f64,
}

impl Prediction {
    pub fn from_raw(raw: f64) -> Self {
        Self {
            raw,
            normalized: (raw / 2.0).clamp(0.0, 5.0),
        }
    }
}

/// The aggregator's combined verdict for one evaluation cycle.
///
/// Derived, recomputed every cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallVerdict {
    pub tier: OverallTier,
    pub emoji: &'static str,
    /// 0-5 dots on the display
    pub confidence: u8,
    /// Weighted blend, clamped to [0, 5]
    pub combined_score: f64,
    /// True when severe onshore wind short-circuited the blend
    pub wind_override: bool,
    /// True when an external prediction was blended in
    pub has_prediction: bool,
}
