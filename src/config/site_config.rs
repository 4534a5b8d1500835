//! Site Configuration - scoring thresholds and service settings as tunable TOML values
//!
//! Every threshold the analyzers and aggregator use is a field here. Each
//! struct implements `Default` with values matching the original constants,
//! so behavior is unchanged when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a surf spot deployment.
///
/// Load with `SiteConfig::load()` which searches:
/// 1. `$SURFSENSE_CONFIG` env var
/// 2. `./site_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Spot identification
    #[serde(default)]
    pub site: SiteInfo,

    /// Wind analyzer thresholds
    #[serde(default)]
    pub wind: WindConfig,

    /// Swell analyzer thresholds
    #[serde(default)]
    pub swell: SwellConfig,

    /// Tide analyzer scores
    #[serde(default)]
    pub tide: TideConfig,

    /// Aggregator weights and tier thresholds
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Narrative enhancement pipeline settings
    #[serde(default)]
    pub enhancement: EnhancementConfig,

    /// External prediction service settings
    #[serde(default)]
    pub prediction: PredictionConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Evaluation loop timing
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            wind: WindConfig::default(),
            swell: SwellConfig::default(),
            tide: TideConfig::default(),
            aggregator: AggregatorConfig::default(),
            enhancement: EnhancementConfig::default(),
            prediction: PredictionConfig::default(),
            server: ServerConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SURFSENSE_CONFIG` environment variable
    /// 2. `./site_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SURFSENSE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), site = %config.site.name, "Loaded site config from SURFSENSE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SURFSENSE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SURFSENSE_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("site_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(site = %config.site.name, "Loaded site config from ./site_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./site_config.toml, using defaults");
                }
            }
        }

        info!("No site_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity-check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.aggregator;
        let weight_sum = a.wind_weight + a.swell_weight + a.tide_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "aggregator weights must sum to 1.0, got {weight_sum}"
            )));
        }
        if self.wind.offshore_min_degrees >= self.wind.offshore_max_degrees {
            return Err(ConfigError::Invalid(
                "wind.offshore_min_degrees must be below offshore_max_degrees".to_string(),
            ));
        }
        if self.swell.windswell_period_seconds > self.swell.long_period_seconds {
            return Err(ConfigError::Invalid(
                "swell.windswell_period_seconds must not exceed long_period_seconds".to_string(),
            ));
        }
        if self.enhancement.max_response_chars == 0 {
            return Err(ConfigError::Invalid(
                "enhancement.max_response_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {0:?}: {1}")]
    Parse(PathBuf, #[source] Box<toml::de::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Sections
// ============================================================================

/// Spot identification shown in logs and the API meta block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub timezone: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Ocean Beach SF".to_string(),
            timezone: "America/Los_Angeles".to_string(),
        }
    }
}

/// Wind analyzer thresholds. Speeds in knots, directions in degrees true.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Offshore band: wind from land to sea improves quality at any speed
    pub offshore_min_degrees: f64,
    pub offshore_max_degrees: f64,
    /// Offshore at or above this speed scores 3 instead of 5
    pub offshore_strong_knots: f64,
    pub glassy_max_knots: f64,
    pub light_max_knots: f64,
    pub moderate_max_knots: f64,
    pub strong_max_knots: f64,
    pub very_strong_max_knots: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            offshore_min_degrees: 45.0,
            offshore_max_degrees: 135.0,
            offshore_strong_knots: 25.0,
            glassy_max_knots: 3.0,
            light_max_knots: 5.0,
            moderate_max_knots: 8.0,
            strong_max_knots: 12.0,
            very_strong_max_knots: 18.0,
        }
    }
}

/// Swell analyzer thresholds. Heights in feet, periods in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwellConfig {
    /// At or above this height a swell counts as "large"
    pub large_height_feet: f64,
    /// At or above this period a swell counts as "long period"
    pub long_period_seconds: f64,
    /// Below this period a swell is windswell
    pub windswell_period_seconds: f64,
    /// Below this height a short-period swell is graded flat/choppy
    pub flat_height_feet: f64,
    /// Firing override: height threshold
    pub firing_height_feet: f64,
    /// Firing override: period threshold
    pub firing_period_seconds: f64,
}

impl Default for SwellConfig {
    fn default() -> Self {
        Self {
            large_height_feet: 5.0,
            long_period_seconds: 15.0,
            windswell_period_seconds: 12.0,
            flat_height_feet: 2.0,
            firing_height_feet: 10.0,
            firing_period_seconds: 18.0,
        }
    }
}

/// Tide analyzer scores for this site's prevailing swell approach.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TideConfig {
    /// Score on a dropping tide (best for the sandbar here)
    pub dropping_score: f64,
    /// Score on a rising tide
    pub rising_score: f64,
    /// Neutral score when direction cannot be inferred
    pub neutral_score: f64,
}

impl Default for TideConfig {
    fn default() -> Self {
        Self {
            dropping_score: 4.5,
            rising_score: 2.0,
            neutral_score: 2.5,
        }
    }
}

/// Aggregator blend weights and tier cut-offs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub wind_weight: f64,
    pub swell_weight: f64,
    pub tide_weight: f64,
    /// Share given to a normalized external prediction on the normal path
    pub prediction_weight: f64,
    /// Capped-blend weights used when wind score <= 2 and not offshore
    pub capped_wind_weight: f64,
    pub capped_swell_weight: f64,
    pub capped_tide_weight: f64,
    pub capped_prediction_weight: f64,
    /// Ceiling applied to the capped blend
    pub capped_ceiling: f64,
    /// Tier thresholds on the combined score
    pub epic_min: f64,
    pub good_min: f64,
    pub fair_min: f64,
    pub poor_min: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            wind_weight: 0.4,
            swell_weight: 0.4,
            tide_weight: 0.2,
            prediction_weight: 0.3,
            capped_wind_weight: 0.6,
            capped_swell_weight: 0.3,
            capped_tide_weight: 0.1,
            capped_prediction_weight: 0.2,
            capped_ceiling: 2.5,
            epic_min: 4.2,
            good_min: 3.5,
            fair_min: 2.5,
            poor_min: 1.5,
        }
    }
}

/// Narrative enhancement pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    /// Chat-completions endpoint (a gateway in front of the upstream service)
    pub api_url: String,
    /// Bearer token; when empty the `SURFSENSE_ENHANCE_KEY` env var is tried,
    /// and with neither present the pipeline runs in not-configured mode
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Debounce window before a trigger is acted on
    pub debounce_ms: u64,
    /// Window in which a repeated (narrative, context) key joins the prior call
    pub duplicate_window_ms: u64,
    /// Hard ceiling on the external call
    pub timeout_secs: u64,
    /// Result cache time-to-live
    pub cache_ttl_secs: u64,
    /// Response validation bounds
    pub min_response_chars: usize,
    pub max_response_chars: usize,
    /// Reject responses longer than this multiple of the input narrative
    pub max_growth_factor: f64,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
            temperature: 0.3,
            debounce_ms: 500,
            duplicate_window_ms: 2000,
            timeout_secs: 10,
            cache_ttl_secs: 30 * 60,
            min_response_chars: 10,
            max_response_chars: 400,
            max_growth_factor: 2.0,
        }
    }
}

/// External numeric prediction service. Optional; absence never blocks scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Endpoint URL; empty disables the prediction leg entirely
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout_secs: 5,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Evaluation loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Seconds between evaluation cycles
    pub interval_secs: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_weights_match_original_blend() {
        let a = AggregatorConfig::default();
        assert!((a.wind_weight - 0.4).abs() < f64::EPSILON);
        assert!((a.swell_weight - 0.4).abs() < f64::EPSILON);
        assert!((a.tide_weight - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
            [wind]
            offshore_strong_knots = 30.0
        "#;
        let config: SiteConfig = toml::from_str(toml_str).expect("parse");
        assert!((config.wind.offshore_strong_knots - 30.0).abs() < f64::EPSILON);
        // Untouched sections keep defaults
        assert!((config.swell.large_height_feet - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.enhancement.debounce_ms, 500);
    }

    #[test]
    fn bad_weights_rejected() {
        let mut config = SiteConfig::default();
        config.aggregator.wind_weight = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_offshore_band_rejected() {
        let mut config = SiteConfig::default();
        config.wind.offshore_min_degrees = 200.0;
        assert!(config.validate().is_err());
    }
}
