//! Reading acquisition boundary
//!
//! Adapters own fetching, retry, parsing, and unit conversion; the core only
//! sees already-normalized readings through the [`ReadingSource`] trait. The
//! synthetic source keeps the binary runnable without live feeds.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::types::{SwellReading, TideKind, TidePrediction, TideSeries, WindReading};

/// One cycle's worth of normalized readings.
#[derive(Debug, Clone)]
pub struct SiteReadings {
    pub wind: WindReading,
    pub swell: SwellReading,
    pub tides: TideSeries,
}

/// Seam for whatever supplies readings: live adapters, replay, or synthetic.
#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Produce the current readings. Errors are per-cycle; the evaluation
    /// loop logs and retries on the next tick.
    async fn fetch(&mut self) -> Result<SiteReadings>;
}

/// Synthetic source producing plausible conditions with mild wobble.
///
/// Tide extremes alternate on the semidiurnal rhythm around the current time
/// so the tide analyzer always has a bracketing pair to work with.
pub struct SyntheticSource;

#[async_trait]
impl ReadingSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch(&mut self) -> Result<SiteReadings> {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        let wind = WindReading::new(
            rng.gen_range(2.0..14.0),
            rng.gen_range(200.0..320.0),
        );
        let swell = SwellReading::new(
            rng.gen_range(2.0..9.0),
            rng.gen_range(8.0..18.0),
        );

        // Two full semidiurnal cycles bracketing now, ~6h12m apart
        let step = Duration::minutes(6 * 60 + 12);
        let mut predictions = Vec::with_capacity(4);
        let mut t = now - Duration::hours(2);
        let mut kind = TideKind::High;
        for _ in 0..4 {
            let height = match kind {
                TideKind::High => rng.gen_range(4.5..6.0),
                TideKind::Low => rng.gen_range(0.2..1.5),
            };
            predictions.push(TidePrediction {
                timestamp: t,
                height_feet: height,
                kind,
            });
            t += step;
            kind = match kind {
                TideKind::High => TideKind::Low,
                TideKind::Low => TideKind::High,
            };
        }

        Ok(SiteReadings {
            wind,
            swell,
            tides: TideSeries::new(predictions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn synthetic_readings_are_in_range() {
        let mut source = SyntheticSource;
        let readings = source.fetch().await.expect("synthetic never fails");

        assert!(readings.wind.speed_knots >= 0.0);
        assert!((0.0..360.0).contains(&readings.wind.direction_degrees));
        assert!(readings.swell.height_feet >= 0.0);
        assert_eq!(readings.tides.len(), 4);

        // Alternating kinds, sorted times
        let p = &readings.tides.predictions;
        assert!(p.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(p.windows(2).all(|w| w[0].kind != w[1].kind));
    }
}
