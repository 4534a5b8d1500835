//! Normalized sensor readings delivered by the acquisition boundary.
//!
//! Adapters own retry, parsing, and unit conversion; everything in here is
//! already in knots, feet, seconds, and degrees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single wind-station observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    /// Sustained wind speed in knots (>= 0)
    pub speed_knots: f64,
    /// Direction the wind blows from, degrees true
    pub direction_degrees: f64,
}

impl WindReading {
    /// Create a reading with the direction wrapped into [0, 360).
    pub fn new(speed_knots: f64, direction_degrees: f64) -> Self {
        Self {
            speed_knots: speed_knots.max(0.0),
            direction_degrees: direction_degrees.rem_euclid(360.0),
        }
    }
}

/// A single wave-buoy observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwellReading {
    /// Significant wave height in feet (>= 0)
    pub height_feet: f64,
    /// Dominant swell period in seconds (>= 0)
    pub period_seconds: f64,
}

impl SwellReading {
    pub fn new(height_feet: f64, period_seconds: f64) -> Self {
        Self {
            height_feet: height_feet.max(0.0),
            period_seconds: period_seconds.max(0.0),
        }
    }
}

/// High/low marker on a tide-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideKind {
    #[serde(rename = "H")]
    High,
    #[serde(rename = "L")]
    Low,
}

/// One predicted tide extreme from the tide-table adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TidePrediction {
    pub timestamp: DateTime<Utc>,
    pub height_feet: f64,
    pub kind: TideKind,
}

/// An ordered-by-time run of tide predictions.
///
/// Directional inference needs at least two entries. Callers should deliver
/// the series sorted; the analyzer sorts defensively anyway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TideSeries {
    pub predictions: Vec<TidePrediction>,
}

impl TideSeries {
    pub fn new(predictions: Vec<TidePrediction>) -> Self {
        Self { predictions }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// The four headline numbers shipped to the enhancement service alongside a
/// narrative, and hashed into the pipeline's cache key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    pub wave_height_feet: f64,
    pub wave_period_seconds: f64,
    pub wind_speed_knots: f64,
    pub wind_direction_degrees: f64,
}
