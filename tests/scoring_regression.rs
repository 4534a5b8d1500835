//! End-to-end scoring regression suite
//!
//! Locks the analyzer breakpoints, the aggregator blend, and the override
//! rules to their reference values.

use chrono::{TimeZone, Utc};
use surfsense::analysis::{self, swell, tide, wind};
use surfsense::config::{self, SiteConfig};
use surfsense::types::{
    OverallTier, Prediction, QualityTier, SwellReading, TideAnalysis, TideDirection, TideKind,
    TidePrediction, TideSeries, WindAnalysis, WindReading,
};

fn ensure_config() {
    if !config::is_initialized() {
        config::init(SiteConfig::default());
    }
}

fn dropping_tide() -> TideAnalysis {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).single().expect("valid time");
    let series = TideSeries::new(vec![
        TidePrediction {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).single().expect("valid time"),
            height_feet: 5.2,
            kind: TideKind::High,
        },
        TidePrediction {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid time"),
            height_feet: 0.8,
            kind: TideKind::Low,
        },
    ]);
    tide::analyze(&series, now)
}

#[test]
fn offshore_band_is_excellent_regardless_of_speed() {
    ensure_config();
    for speed in [1.0, 8.0, 15.0, 24.0] {
        let result = wind::analyze(&WindReading::new(speed, 100.0));
        assert_eq!(result.tier, QualityTier::Excellent, "speed {speed}");
        assert!((result.score - 5.0).abs() < f64::EPSILON);
    }
    // At 25kt and above offshore still grades Excellent but scores 3
    for speed in [25.0, 40.0] {
        let result = wind::analyze(&WindReading::new(speed, 100.0));
        assert_eq!(result.tier, QualityTier::Excellent, "speed {speed}");
        assert!((result.score - 3.0).abs() < f64::EPSILON);
    }
}

#[test]
fn swell_height_boundary_is_inclusive() {
    ensure_config();
    let at_boundary = swell::analyze(&SwellReading::new(5.0, 15.0));
    assert_eq!(at_boundary.tier, QualityTier::Excellent);
    assert!((at_boundary.score - 5.0).abs() < f64::EPSILON);

    let below_boundary = swell::analyze(&SwellReading::new(4.99, 15.0));
    assert_eq!(below_boundary.tier, QualityTier::Good);
    assert!((below_boundary.score - 4.0).abs() < f64::EPSILON);
}

#[test]
fn short_tide_series_never_fails() {
    ensure_config();
    let now = Utc::now();
    for predictions in [vec![], vec![TidePrediction {
        timestamp: now,
        height_feet: 3.0,
        kind: TideKind::High,
    }]] {
        let result = tide::analyze(&TideSeries::new(predictions), now);
        assert_eq!(result.direction, TideDirection::Unknown);
        assert!((result.score - 2.5).abs() < f64::EPSILON);
    }
}

#[test]
fn severe_onshore_wind_short_circuits_everything() {
    ensure_config();
    let wind = WindAnalysis {
        tier: QualityTier::Poor,
        score: 0.5,
        text: "17kts W (too windy)".to_string(),
        is_offshore: false,
    };
    let swell_reading = SwellReading::new(8.0, 17.0);
    let swell = swell::analyze(&swell_reading);
    let tide = dropping_tide();

    let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);
    assert_eq!(verdict.tier, OverallTier::Terrible);
    assert_eq!(verdict.confidence, 5);
    assert!((verdict.combined_score - 0.5).abs() < f64::EPSILON);
    assert!(verdict.wind_override);
}

#[test]
fn firing_override_beats_a_fair_combined_score() {
    ensure_config();
    let wind = wind::analyze(&WindReading::new(8.0, 240.0));
    let swell_reading = SwellReading::new(12.0, 20.0);
    let swell = swell::analyze(&swell_reading);
    let tide = dropping_tide();

    let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);
    assert_eq!(verdict.tier, OverallTier::Firing);
}

#[test]
fn reference_blend_without_prediction() {
    ensure_config();
    let wind = wind::analyze(&WindReading::new(8.0, 240.0));
    assert_eq!(wind.tier, QualityTier::Fair);
    assert!((wind.score - 2.5).abs() < f64::EPSILON);
    assert!(!wind.is_offshore);

    let swell_reading = SwellReading::new(3.0, 11.0);
    let swell = swell::analyze(&swell_reading);
    assert_eq!(swell.tier, QualityTier::Fair);
    assert!((swell.score - 2.0).abs() < f64::EPSILON);

    let tide = dropping_tide();
    assert_eq!(tide.tier, QualityTier::Excellent);
    assert!((tide.score - 4.5).abs() < f64::EPSILON);

    let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);
    assert!((verdict.combined_score - 2.7).abs() < 1e-9);
    assert_eq!(verdict.tier, OverallTier::Fair);
    assert_eq!(verdict.confidence, 3);
}

#[test]
fn reference_blend_with_prediction_raises_confidence_not_tier() {
    ensure_config();
    let wind = wind::analyze(&WindReading::new(8.0, 240.0));
    let swell_reading = SwellReading::new(3.0, 11.0);
    let swell = swell::analyze(&swell_reading);
    let tide = dropping_tide();

    let prediction = Prediction::from_raw(8.0);
    let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, Some(&prediction));
    // 2.7*0.7 + 4.0*0.3 = 3.09: below the 3.5 Good threshold
    assert!((verdict.combined_score - 3.09).abs() < 1e-9);
    assert_eq!(verdict.tier, OverallTier::Fair);
    assert_eq!(verdict.confidence, 4);
}
