//! Swell analyzer - 2D height/period classification
//!
//! Quality is a joint lookup on height and period, not a single threshold:
//! a small long-period swell beats a rideable short-period windswell. Lower
//! edges are inclusive (`>=`), upper comparisons exclusive.

use crate::config;
use crate::types::{QualityTier, SwellAnalysis, SwellCharacter, SwellReading};

use super::fmt_num;

/// Grade a swell reading. Pure and deterministic.
pub fn analyze(reading: &SwellReading) -> SwellAnalysis {
    let cfg = &config::get().swell;
    let height = reading.height_feet;
    let period = reading.period_seconds;

    let (tier, score, character, label) = if height >= cfg.large_height_feet
        && period >= cfg.long_period_seconds
    {
        (
            QualityTier::Excellent,
            5.0,
            SwellCharacter::LongPeriod,
            "long period swell",
        )
    } else if height < cfg.large_height_feet && period >= cfg.long_period_seconds {
        (
            QualityTier::Good,
            4.0,
            SwellCharacter::SmallClean,
            "small but good quality",
        )
    } else if period >= cfg.windswell_period_seconds && period < cfg.long_period_seconds {
        (QualityTier::Fair, 3.0, SwellCharacter::MidPeriod, "mid-period")
    } else if height >= cfg.flat_height_feet {
        (QualityTier::Fair, 2.0, SwellCharacter::Windswell, "windswell")
    } else {
        (QualityTier::Poor, 1.0, SwellCharacter::Choppy, "small & choppy")
    };

    SwellAnalysis {
        tier,
        score,
        text: format!("{}ft @ {}s ({label})", fmt_num(height), fmt_num(period)),
        character,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::ensure_config;

    #[test]
    fn large_long_period_is_excellent() {
        ensure_config();
        let result = analyze(&SwellReading::new(5.0, 15.0));
        assert_eq!(result.tier, QualityTier::Excellent);
        assert!((result.score - 5.0).abs() < f64::EPSILON);
        assert_eq!(result.character, SwellCharacter::LongPeriod);
    }

    #[test]
    fn height_boundary_is_inclusive() {
        ensure_config();
        // 4.99ft at 15s drops to the small-but-good bucket
        let result = analyze(&SwellReading::new(4.99, 15.0));
        assert_eq!(result.tier, QualityTier::Good);
        assert!((result.score - 4.0).abs() < f64::EPSILON);
        assert_eq!(result.character, SwellCharacter::SmallClean);
    }

    #[test]
    fn short_period_is_windswell() {
        ensure_config();
        for (height, period) in [(6.0, 9.0), (3.0, 11.0)] {
            let result = analyze(&SwellReading::new(height, period));
            assert_eq!(result.tier, QualityTier::Fair, "{height}ft @ {period}s");
            assert!((result.score - 2.0).abs() < f64::EPSILON);
            assert_eq!(result.character, SwellCharacter::Windswell);
        }
    }

    #[test]
    fn mid_period_is_fair_regardless_of_height() {
        ensure_config();
        for height in [1.0, 5.0, 12.0] {
            let result = analyze(&SwellReading::new(height, 13.0));
            assert_eq!(result.tier, QualityTier::Fair, "height {height}");
            assert!((result.score - 3.0).abs() < f64::EPSILON);
            assert_eq!(result.character, SwellCharacter::MidPeriod);
        }
    }

    #[test]
    fn mid_period_edges() {
        ensure_config();
        // 12s inclusive at the bottom, 15s exclusive at the top (large swell)
        assert_eq!(
            analyze(&SwellReading::new(8.0, 12.0)).character,
            SwellCharacter::MidPeriod
        );
        assert_eq!(
            analyze(&SwellReading::new(8.0, 15.0)).character,
            SwellCharacter::LongPeriod
        );
        assert_eq!(
            analyze(&SwellReading::new(8.0, 11.9)).character,
            SwellCharacter::Windswell
        );
    }

    #[test]
    fn flat_short_period_is_poor() {
        ensure_config();
        let result = analyze(&SwellReading::new(1.5, 8.0));
        assert_eq!(result.tier, QualityTier::Poor);
        assert!((result.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.character, SwellCharacter::Choppy);
    }

    #[test]
    fn text_includes_height_and_period() {
        ensure_config();
        let result = analyze(&SwellReading::new(3.0, 11.0));
        assert!(result.text.contains("3ft"));
        assert!(result.text.contains("11s"));
    }
}
