//! Quality aggregator - combines the three factor analyses into one verdict
//!
//! ## Blend and overrides
//!
//! Checked in order:
//! 1. **Severe onshore wind** (score <= 1, not offshore) forces Terrible and
//!    bypasses every other input. Nothing else matters in a gale.
//! 2. **Strong onshore wind** (score <= 2, not offshore) switches to a
//!    wind-heavy capped blend (60/30/10, ceiling 2.5).
//! 3. Normal path: wind 40% / swell 40% / tide 20%, optionally reblended
//!    70/30 with a normalized external prediction, then a **firing override**
//!    when a large long-period swell meets a dropping tide.
//!
//! Confidence (0-5 dots) rises with the tier and gains one dot when an
//! external prediction was blended in, clamped to 5.

use tracing::info;

use crate::config;
use crate::types::{
    OverallTier, OverallVerdict, Prediction, SwellAnalysis, SwellReading, TideAnalysis,
    WindAnalysis,
};

/// Combine factor analyses (and an optional external prediction) into the
/// overall verdict for this evaluation cycle.
pub fn aggregate(
    wind: &WindAnalysis,
    swell: &SwellAnalysis,
    tide: &TideAnalysis,
    swell_reading: &SwellReading,
    prediction: Option<&Prediction>,
) -> OverallVerdict {
    let cfg = &config::get().aggregator;
    let has_prediction = prediction.is_some();

    // Severe onshore wind: short-circuit, everything else is irrelevant
    if wind.score <= 1.0 && !wind.is_offshore {
        let verdict = OverallVerdict {
            tier: OverallTier::Terrible,
            emoji: "💨",
            confidence: 5,
            combined_score: 0.5,
            wind_override: true,
            has_prediction,
        };
        log_verdict(&verdict, wind, swell, tide);
        return verdict;
    }

    // Strong onshore wind: capped wind-heavy blend
    if wind.score <= 2.0 && !wind.is_offshore {
        let mut combined = (wind.score * cfg.capped_wind_weight
            + swell.score * cfg.capped_swell_weight
            + tide.score * cfg.capped_tide_weight)
            .min(cfg.capped_ceiling);
        if let Some(p) = prediction {
            let capped_prediction = (p.normalized / 2.0).min(cfg.capped_ceiling);
            combined = (combined * (1.0 - cfg.capped_prediction_weight)
                + capped_prediction * cfg.capped_prediction_weight)
                .min(cfg.capped_ceiling);
        }
        let (tier, emoji) = if combined >= 2.0 {
            (OverallTier::Poor, "💨")
        } else {
            (OverallTier::Terrible, "🌪️")
        };
        let verdict = OverallVerdict {
            tier,
            emoji,
            confidence: 4,
            combined_score: combined,
            wind_override: true,
            has_prediction,
        };
        log_verdict(&verdict, wind, swell, tide);
        return verdict;
    }

    // Normal path: weighted blend, optionally reblended with the prediction
    let mut combined = wind.score * cfg.wind_weight
        + swell.score * cfg.swell_weight
        + tide.score * cfg.tide_weight;
    if let Some(p) = prediction {
        combined =
            combined * (1.0 - cfg.prediction_weight) + p.normalized * cfg.prediction_weight;
    }
    let combined = combined.clamp(0.0, 5.0);

    let swell_cfg = &config::get().swell;
    let is_firing = swell_reading.height_feet >= swell_cfg.firing_height_feet
        && swell_reading.period_seconds >= swell_cfg.firing_period_seconds
        && tide.is_dropping;

    let (tier, emoji, base_confidence) = if is_firing {
        (OverallTier::Firing, "🔥", 5)
    } else if combined >= cfg.epic_min {
        (OverallTier::Epic, "⚡", 5)
    } else if combined >= cfg.good_min {
        (OverallTier::Good, "👌", 4)
    } else if combined >= cfg.fair_min {
        (OverallTier::Fair, "🤷‍♂️", 3)
    } else if combined >= cfg.poor_min {
        (OverallTier::Poor, "😬", 2)
    } else {
        (OverallTier::Terrible, "💀", 1)
    };

    let confidence = if has_prediction {
        (base_confidence + 1).min(5)
    } else {
        base_confidence
    };

    let verdict = OverallVerdict {
        tier,
        emoji,
        confidence,
        combined_score: combined,
        wind_override: false,
        has_prediction,
    };
    log_verdict(&verdict, wind, swell, tide);
    verdict
}

fn log_verdict(
    verdict: &OverallVerdict,
    wind: &WindAnalysis,
    swell: &SwellAnalysis,
    tide: &TideAnalysis,
) {
    info!(
        tier = %verdict.tier,
        score = verdict.combined_score,
        confidence = verdict.confidence,
        wind_score = wind.score,
        swell_score = swell.score,
        tide_score = tide.score,
        wind_override = verdict.wind_override,
        has_prediction = verdict.has_prediction,
        "Surf verdict aggregated"
    );
}

// ============================================================================
// Tests
// ============================================================================
