//! Per-factor analysis outputs shared by the three analyzers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quality tier assigned by an individual analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
    Dangerous,
    Unknown,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Dangerous => "dangerous",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Which way the tide is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideDirection {
    Dropping,
    Rising,
    Unknown,
}

impl std::fmt::Display for TideDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Dropping => "dropping",
            Self::Rising => "rising",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Wind grading result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindAnalysis {
    pub tier: QualityTier,
    /// 0-5, higher is better
    pub score: f64,
    /// e.g. "7kts NW (windy)"
    pub text: String,
    /// True when direction falls in the offshore band
    pub is_offshore: bool,
}

/// Swell shape classification from the 2D height/period lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwellCharacter {
    LongPeriod,
    SmallClean,
    Windswell,
    MidPeriod,
    Choppy,
}

/// Swell grading result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwellAnalysis {
    pub tier: QualityTier,
    pub score: f64,
    /// e.g. "6ft @ 16s (long period swell)"
    pub text: String,
    pub character: SwellCharacter,
}

/// The next high-tide extreme, kept for the narrative's timing clause.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpcomingHighTide {
    pub timestamp: DateTime<Utc>,
    pub height_feet: f64,
    /// Whole hours until the turn
    pub hours_until: i64,
    /// Remaining minutes past the whole hours
    pub minutes_until: i64,
}

/// Tide grading result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideAnalysis {
    pub tier: QualityTier,
    pub score: f64,
    /// e.g. "tide dropping"
    pub text: String,
    pub direction: TideDirection,
    pub is_dropping: bool,
    /// Present when a future high tide is known (rising phase, or scan-ahead)
    pub next_high: Option<UpcomingHighTide>,
}

impl TideAnalysis {
    /// Neutral result used whenever the series cannot support a directional
    /// verdict. Insufficient input is resolved, never surfaced as an error.
    pub fn unknown() -> Self {
        Self {
            tier: QualityTier::Unknown,
            score: 2.5,
            text: "tide data unavailable".to_string(),
            direction: TideDirection::Unknown,
            is_dropping: false,
            next_high: None,
        }
    }
}
