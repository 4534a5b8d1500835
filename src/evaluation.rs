//! Evaluation coordinator - one full scoring cycle per tick
//!
//! Pulls readings from the configured source, runs the three analyzers and
//! the aggregator, renders the narrative, and pushes it through the
//! enhancement pipeline. The latest report is shared with the API layer
//! through an `RwLock`; it is recomputed every cycle and never persisted.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::acquisition::ReadingSource;
use crate::analysis;
use crate::enhancement::EnhancementHandle;
use crate::narrative::NarrativeGenerator;
use crate::prediction::PredictionService;
use crate::types::{
    ConditionsSnapshot, EnhancementResult, OverallVerdict, Prediction, SwellAnalysis,
    TideAnalysis, WindAnalysis,
};

/// Everything the presentation boundary needs from one evaluation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionsReport {
    pub generated_at: DateTime<Utc>,
    pub wind: WindAnalysis,
    pub swell: SwellAnalysis,
    pub tide: TideAnalysis,
    pub verdict: OverallVerdict,
    /// Rule-based narrative before enhancement
    pub narrative: String,
    /// Post-pipeline displayed text and provenance
    pub display: EnhancementResult,
    pub prediction: Option<Prediction>,
}

/// Latest report, shared between the evaluation loop and the API.
pub type SharedReport = Arc<RwLock<Option<ConditionsReport>>>;

/// Drives the scoring engine and the enhancement pipeline.
pub struct Evaluator {
    source: Box<dyn ReadingSource>,
    predictor: Option<Arc<dyn PredictionService>>,
    generator: NarrativeGenerator,
    enhancer: EnhancementHandle,
}

impl Evaluator {
    pub fn new(
        source: Box<dyn ReadingSource>,
        predictor: Option<Arc<dyn PredictionService>>,
        generator: NarrativeGenerator,
        enhancer: EnhancementHandle,
    ) -> Self {
        Self {
            source,
            predictor,
            generator,
            enhancer,
        }
    }

    /// Run one full cycle: readings -> analyses -> verdict -> narrative ->
    /// enhanced display text.
    pub async fn evaluate_once(&mut self, now: DateTime<Utc>) -> Result<ConditionsReport> {
        let readings = self.source.fetch().await?;

        let wind = analysis::wind::analyze(&readings.wind);
        let swell = analysis::swell::analyze(&readings.swell);
        let tide = analysis::tide::analyze(&readings.tides, now);

        // The prediction leg is optional and must never block scoring
        let prediction = match &self.predictor {
            Some(service) => {
                service
                    .predict(
                        tide.direction,
                        readings.wind.direction_degrees,
                        readings.swell.height_feet,
                    )
                    .await
            }
            None => None,
        };

        let verdict = analysis::aggregate(
            &wind,
            &swell,
            &tide,
            &readings.swell,
            prediction.as_ref(),
        );
        let narrative =
            self.generator
                .generate(&wind, &swell, &tide, &verdict, prediction.as_ref(), false);

        let snapshot = ConditionsSnapshot {
            wave_height_feet: readings.swell.height_feet,
            wave_period_seconds: readings.swell.period_seconds,
            wind_speed_knots: readings.wind.speed_knots,
            wind_direction_degrees: readings.wind.direction_degrees,
        };

        let display = match self.enhancer.submit(narrative.clone(), snapshot).await {
            Ok(result) => result,
            // Pipeline tearing down mid-cycle: show the rule-based text as-is
            Err(_closed) => EnhancementResult {
                text: narrative.clone(),
                was_enhanced: false,
                cached: false,
                reason: None,
            },
        };

        let was_enhanced = display.was_enhanced;
        info!(
            tier = %verdict.tier,
            score = verdict.combined_score,
            enhanced = was_enhanced,
            source = self.source.name(),
            "Evaluation cycle complete"
        );

        Ok(ConditionsReport {
            generated_at: now,
            wind,
            swell,
            tide,
            verdict,
            narrative,
            display,
            prediction,
        })
    }

    /// Evaluation loop: tick, evaluate, publish, until shutdown.
    pub async fn run(
        mut self,
        report: SharedReport,
        interval: Duration,
        shutdown: CancellationToken,
    ) {
        info!(interval_secs = interval.as_secs(), "Evaluator starting");
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    match self.evaluate_once(Utc::now()).await {
                        Ok(cycle) => {
                            *report.write().await = Some(cycle);
                        }
                        Err(e) => {
                            error!(error = %e, "Evaluation cycle failed — keeping previous report");
                        }
                    }
                }
            }
        }

        info!("Evaluator stopped");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::SiteReadings;
    use crate::enhancement::{
        EnhancementClient, EnhancementError, EnhancementPipeline, PipelineSettings, SystemClock,
    };
    use crate::narrative::FixedSelector;
    use crate::types::{
        FallbackReason, SwellReading, TideKind, TidePrediction, TideSeries, WindReading,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn ensure_config() {
        if !crate::config::is_initialized() {
            crate::config::init(crate::config::SiteConfig::default());
        }
    }

    struct FixedSource;

    #[async_trait]
    impl ReadingSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&mut self) -> Result<SiteReadings> {
            let base = Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).single().expect("valid");
            Ok(SiteReadings {
                wind: WindReading::new(8.0, 240.0),
                swell: SwellReading::new(3.0, 11.0),
                tides: TideSeries::new(vec![
                    TidePrediction {
                        timestamp: base,
                        height_feet: 5.2,
                        kind: TideKind::High,
                    },
                    TidePrediction {
                        timestamp: base + chrono::Duration::hours(6),
                        height_feet: 0.8,
                        kind: TideKind::Low,
                    },
                ]),
            })
        }
    }

    struct UnconfiguredClient;

    #[async_trait]
    impl EnhancementClient for UnconfiguredClient {
        async fn enhance(
            &self,
            _narrative: &str,
            _snapshot: &ConditionsSnapshot,
        ) -> Result<String, EnhancementError> {
            Err(EnhancementError::NotConfigured)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_cycle_produces_fair_verdict_with_fallback_text() {
        ensure_config();
        let token = CancellationToken::new();
        let settings = PipelineSettings::from(&crate::config::get().enhancement);
        let (pipeline, handle) = EnhancementPipeline::new(
            Arc::new(UnconfiguredClient),
            settings,
            Arc::new(SystemClock),
            token.clone(),
        );
        tokio::spawn(pipeline.run());

        let mut evaluator = Evaluator::new(
            Box::new(FixedSource),
            None,
            NarrativeGenerator::new(Box::new(FixedSelector(0))),
            handle,
        );

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).single().expect("valid");
        let report = evaluator.evaluate_once(now).await.expect("cycle runs");

        // 2.5*0.4 + 2*0.4 + 4.5*0.2 = 2.7 -> Fair
        assert_eq!(report.verdict.tier, crate::types::OverallTier::Fair);
        assert_eq!(report.verdict.confidence, 3);
        assert!(report.tide.is_dropping);

        // Unconfigured service: the displayed text is the rule-based narrative
        assert!(!report.display.was_enhanced);
        assert_eq!(report.display.reason, Some(FallbackReason::NotConfigured));
        assert_eq!(report.display.text, report.narrative);
        token.cancel();
    }
}
