//! Narrative generator - renders the verdict into a human-readable summary
//!
//! Deterministic given its inputs and a selector: the only sanctioned
//! non-determinism is the variant pick, which is injected.

use crate::types::{
    OverallVerdict, Prediction, SwellAnalysis, TideAnalysis, TideDirection, WindAnalysis,
};

use super::templates::{
    self, TemplateSelector, DROPPING_DECOR, PERFECT_TIMING, RISING_DECOR,
};

/// Renders summaries through an injected template selector.
pub struct NarrativeGenerator {
    selector: Box<dyn TemplateSelector>,
}

impl NarrativeGenerator {
    pub fn new(selector: Box<dyn TemplateSelector>) -> Self {
        Self { selector }
    }

    /// Render the full summary sentence for one evaluation cycle.
    ///
    /// `prediction_pending` appends a loading note while the external
    /// prediction fetch is still outstanding.
    pub fn generate(
        &self,
        wind: &WindAnalysis,
        swell: &SwellAnalysis,
        tide: &TideAnalysis,
        verdict: &OverallVerdict,
        prediction: Option<&Prediction>,
        prediction_pending: bool,
    ) -> String {
        let tide_text = self.decorated_tide_text(tide);
        let rec = self.tide_recommendation(tide, wind, swell);
        let ml = prediction_clause(prediction, prediction_pending);

        let variants = templates::summary_variants(
            verdict.tier,
            &swell.text,
            &wind.text,
            &tide_text,
            &rec,
            &ml,
        );
        let idx = self.selector.pick(variants.len());
        variants
            .into_iter()
            .nth(idx)
            .unwrap_or_else(|| format!("{} {}", verdict.emoji, swell.text))
    }

    /// Tide text with a flavor suffix; the analyzer's own text stays plain so
    /// it remains deterministic.
    fn decorated_tide_text(&self, tide: &TideAnalysis) -> String {
        match tide.direction {
            TideDirection::Dropping => {
                let decor = DROPPING_DECOR[self.selector.pick(DROPPING_DECOR.len())];
                format!("tide dropping ({decor})")
            }
            TideDirection::Rising => {
                let decor = RISING_DECOR[self.selector.pick(RISING_DECOR.len())];
                format!("tide rising ({decor})")
            }
            TideDirection::Unknown => tide.text.clone(),
        }
    }

    /// Timing clause keyed on the tide phase and how good the rest looks.
    fn tide_recommendation(
        &self,
        tide: &TideAnalysis,
        wind: &WindAnalysis,
        swell: &SwellAnalysis,
    ) -> String {
        match tide.direction {
            TideDirection::Unknown => "Monitor tide changes for optimal timing.".to_string(),
            TideDirection::Dropping => {
                PERFECT_TIMING[self.selector.pick(PERFECT_TIMING.len())].to_string()
            }
            TideDirection::Rising => match &tide.next_high {
                Some(high) => {
                    let turn_time = high.timestamp.format("%H:%M");
                    if wind.score >= 3.5 && swell.score >= 3.5 {
                        format!(
                            "Consider waiting - tide turns at {turn_time} (in {}h {}m).",
                            high.hours_until, high.minutes_until
                        )
                    } else {
                        format!(
                            "Tide rising (turns at {turn_time}) - better surf after the turn."
                        )
                    }
                }
                None => "Check tide timing for optimal conditions.".to_string(),
            },
        }
    }
}

/// Prediction clause appended to every summary when the external service
/// contributed (or is still being waited on).
fn prediction_clause(prediction: Option<&Prediction>, pending: bool) -> String {
    if pending {
        return " 🧠 Crunching ML data...".to_string();
    }
    match prediction {
        None => String::new(),
        Some(p) => {
            let raw = (p.raw * 10.0).round() / 10.0;
            if raw >= 7.0 {
                format!(" 🧠 ML confidence: HIGH ({raw}/10)")
            } else if raw >= 4.0 {
                format!(" 🧠 ML says: moderate ({raw}/10)")
            } else {
                format!(" 🧠 ML caution: {raw}/10")
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::ensure_config;
    use crate::analysis::{self, swell as swell_analyzer, wind as wind_analyzer};
    use crate::narrative::FixedSelector;
    use crate::types::{
        SwellReading, TideKind, TidePrediction, TideSeries, WindReading,
    };
    use chrono::{TimeZone, Utc};

    fn fixture() -> (WindAnalysis, SwellAnalysis, TideAnalysis, SwellReading) {
        ensure_config();
        let wind = wind_analyzer::analyze(&WindReading::new(8.0, 240.0));
        let swell_reading = SwellReading::new(3.0, 11.0);
        let swell = swell_analyzer::analyze(&swell_reading);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).single().expect("valid");
        let series = TideSeries::new(vec![
            TidePrediction {
                timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).single().expect("valid"),
                height_feet: 5.2,
                kind: TideKind::High,
            },
            TidePrediction {
                timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid"),
                height_feet: 0.8,
                kind: TideKind::Low,
            },
        ]);
        let tide = analysis::tide::analyze(&series, now);
        (wind, swell, tide, swell_reading)
    }

    #[test]
    fn summary_interpolates_all_factor_texts() {
        let (wind, swell, tide, swell_reading) = fixture();
        let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);
        let generator = NarrativeGenerator::new(Box::new(FixedSelector(0)));

        let summary = generator.generate(&wind, &swell, &tide, &verdict, None, false);
        assert!(summary.contains("3ft @ 11s"));
        assert!(summary.contains("8kts SW"));
        assert!(summary.contains("tide dropping"));
        // Fair tier with no prediction: no ML clause
        assert!(!summary.contains("🧠"));
    }

    #[test]
    fn selector_varies_wording_not_content() {
        let (wind, swell, tide, swell_reading) = fixture();
        let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);

        for idx in 0..3 {
            let generator = NarrativeGenerator::new(Box::new(FixedSelector(idx)));
            let summary = generator.generate(&wind, &swell, &tide, &verdict, None, false);
            assert!(summary.contains("3ft @ 11s"), "variant {idx}: {summary}");
        }
    }

    #[test]
    fn prediction_clause_tiers() {
        let high = Prediction::from_raw(8.0);
        let mid = Prediction::from_raw(5.5);
        let low = Prediction::from_raw(2.0);
        assert!(prediction_clause(Some(&high), false).contains("HIGH"));
        assert!(prediction_clause(Some(&mid), false).contains("moderate"));
        assert!(prediction_clause(Some(&low), false).contains("caution"));
        assert!(prediction_clause(None, true).contains("Crunching"));
        assert!(prediction_clause(None, false).is_empty());
    }

    #[test]
    fn rising_tide_recommendation_mentions_turn_time() {
        ensure_config();
        let wind = wind_analyzer::analyze(&WindReading::new(2.0, 90.0));
        let swell_reading = SwellReading::new(6.0, 16.0);
        let swell = swell_analyzer::analyze(&swell_reading);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).single().expect("valid");
        let series = TideSeries::new(vec![
            TidePrediction {
                timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).single().expect("valid"),
                height_feet: 0.8,
                kind: TideKind::Low,
            },
            TidePrediction {
                timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).single().expect("valid"),
                height_feet: 5.4,
                kind: TideKind::High,
            },
        ]);
        let tide = analysis::tide::analyze(&series, now);
        let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);

        let generator = NarrativeGenerator::new(Box::new(FixedSelector(0)));
        let summary = generator.generate(&wind, &swell, &tide, &verdict, None, false);
        // Wind and swell both >= 3.5: recommend waiting for the turn
        assert!(summary.contains("Consider waiting"), "{summary}");
        assert!(summary.contains("12:30"), "{summary}");
        assert!(summary.contains("2h 30m"), "{summary}");
    }

    #[test]
    fn firing_summary_has_no_waiting_clause() {
        let (wind, _, tide, _) = fixture();
        let swell_reading = SwellReading::new(12.0, 20.0);
        let swell = swell_analyzer::analyze(&swell_reading);
        let verdict = analysis::aggregate(&wind, &swell, &tide, &swell_reading, None);
        assert_eq!(verdict.tier, crate::types::OverallTier::Firing);

        let generator = NarrativeGenerator::new(Box::new(FixedSelector(0)));
        let summary = generator.generate(&wind, &swell, &tide, &verdict, None, false);
        assert!(summary.contains("FIRING"), "{summary}");
        assert!(!summary.contains("Consider waiting"));
    }
}
