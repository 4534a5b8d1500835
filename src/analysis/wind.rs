//! Wind analyzer - grades speed and direction into a quality tier
//!
//! The offshore band (wind blowing from land to sea) always grades Excellent
//! regardless of speed; strong offshore moderates the score but never flips
//! the sign. Onshore grading is a descending ladder of speed breakpoints.

use crate::config;
use crate::types::{QualityTier, WindAnalysis, WindReading};

use super::fmt_num;

/// 8-sector compass label for display text.
pub fn compass_label(degrees: f64) -> &'static str {
    let d = degrees.rem_euclid(360.0);
    if !(22.5..337.5).contains(&d) {
        return "N";
    }
    if d < 67.5 {
        "NE"
    } else if d < 112.5 {
        "E"
    } else if d < 157.5 {
        "SE"
    } else if d < 202.5 {
        "S"
    } else if d < 247.5 {
        "SW"
    } else if d < 292.5 {
        "W"
    } else {
        "NW"
    }
}

/// Coarse quadrant label used by the external prediction request.
pub fn quadrant_label(degrees: f64) -> &'static str {
    let d = degrees.rem_euclid(360.0);
    if !(45.0..315.0).contains(&d) {
        "N"
    } else if d < 135.0 {
        "E"
    } else if d < 225.0 {
        "S"
    } else {
        "W"
    }
}

/// Grade a wind reading. Pure and deterministic.
pub fn analyze(reading: &WindReading) -> WindAnalysis {
    let cfg = &config::get().wind;
    let speed = reading.speed_knots;
    let direction = reading.direction_degrees.rem_euclid(360.0);
    let compass = compass_label(direction);
    let speed_txt = fmt_num(speed);

    // Offshore band: quality holds even when it blows hard
    if direction >= cfg.offshore_min_degrees && direction <= cfg.offshore_max_degrees {
        let score = if speed < cfg.offshore_strong_knots {
            5.0
        } else {
            3.0
        };
        return WindAnalysis {
            tier: QualityTier::Excellent,
            score,
            text: format!("{speed_txt}kts {compass} (offshore)"),
            is_offshore: true,
        };
    }

    let (tier, score, band) = if speed <= cfg.glassy_max_knots {
        (QualityTier::Excellent, 5.0, "glassy")
    } else if speed <= cfg.light_max_knots {
        (QualityTier::Good, 4.0, "light wind")
    } else if speed <= cfg.moderate_max_knots {
        (QualityTier::Fair, 2.5, "windy")
    } else if speed <= cfg.strong_max_knots {
        (QualityTier::Poor, 2.0, "very windy")
    } else if speed <= cfg.very_strong_max_knots {
        (QualityTier::Poor, 1.0, "too windy")
    } else {
        (QualityTier::Dangerous, 0.0, "victory at sea!")
    };

    WindAnalysis {
        tier,
        score,
        text: format!("{speed_txt}kts {compass} ({band})"),
        is_offshore: false,
    }
}
