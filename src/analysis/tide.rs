//! Tide analyzer - directional inference over a prediction series
//!
//! Walks a sorted run of high/low extremes to find the bracket around `now`
//! and derives the current direction from the bracketing kinds. A dropping
//! tide is the best state for this site's sandbar. Insufficient or
//! un-bracketed input resolves to a neutral verdict, never an error.

use chrono::{DateTime, Utc};

use crate::config;
use crate::types::{
    QualityTier, TideAnalysis, TideDirection, TideKind, TidePrediction, TideSeries,
    UpcomingHighTide,
};

/// Grade a tide series against the current time.
///
/// The series is sorted defensively; unsorted input is a caller error but
/// still produces a correct verdict.
pub fn analyze(series: &TideSeries, now: DateTime<Utc>) -> TideAnalysis {
    if series.len() < 2 {
        return TideAnalysis::unknown();
    }

    let mut sorted: Vec<TidePrediction> = series.predictions.clone();
    sorted.sort_by_key(|p| p.timestamp);

    // First prediction strictly after now; its predecessor brackets the phase
    let next_idx = sorted.iter().position(|p| p.timestamp > now);

    let mut direction = TideDirection::Unknown;
    let mut next_high: Option<&TidePrediction> = None;

    if let Some(idx) = next_idx {
        if idx > 0 {
            let prev = &sorted[idx - 1];
            let next = &sorted[idx];
            match (prev.kind, next.kind) {
                (TideKind::High, TideKind::Low) => direction = TideDirection::Dropping,
                (TideKind::Low, TideKind::High) => {
                    direction = TideDirection::Rising;
                    next_high = Some(next);
                }
                _ => {}
            }
        }
        // Scan ahead for the first high extreme when the bracket didn't give one;
        // the narrative's timing clause uses it even when direction is unknown
        if next_high.is_none() {
            next_high = sorted[idx..].iter().find(|p| p.kind == TideKind::High);
        }
    }

    let next_high = next_high.map(|p| {
        let delta_minutes = (p.timestamp - now).num_minutes().max(0);
        UpcomingHighTide {
            timestamp: p.timestamp,
            height_feet: p.height_feet,
            hours_until: delta_minutes / 60,
            minutes_until: delta_minutes % 60,
        }
    });

    let cfg = &config::get().tide;
    let (tier, score, text) = match direction {
        TideDirection::Dropping => (
            QualityTier::Excellent,
            cfg.dropping_score,
            "tide dropping".to_string(),
        ),
        TideDirection::Rising => (
            QualityTier::Fair,
            cfg.rising_score,
            "tide rising".to_string(),
        ),
        TideDirection::Unknown => (
            QualityTier::Unknown,
            cfg.neutral_score,
            "tide direction unclear".to_string(),
        ),
    };

    TideAnalysis {
        tier,
        score,
        text,
        direction,
        is_dropping: direction == TideDirection::Dropping,
        next_high,
    }
}
