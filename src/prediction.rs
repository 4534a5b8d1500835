//! Prediction Client — HTTP client for the external numeric prediction service
//!
//! Sends a compact categorical snapshot (tide phase, wind quadrant, two buoy
//! height readings) and receives a score on the service's 0-10 scale, which
//! is normalized to [0, 5] here at the boundary. The service is strictly
//! optional: absence, misconfiguration, or any error resolves to "no data"
//! and never blocks scoring.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::wind::quadrant_label;
use crate::config::PredictionConfig;
use crate::types::{Prediction, TideDirection};

/// Request payload for the prediction service.
#[derive(Debug, Serialize)]
struct PredictionRequest {
    tide: &'static str,
    wind: &'static str,
    pt_reyes: String,
    sf_bar: String,
}

/// Response payload from the prediction service.
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    predicted_score: f64,
}

/// Seam for the external prediction service.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Fetch a prediction for the current conditions. `None` means the
    /// service had nothing usable to say - not an error.
    async fn predict(
        &self,
        tide_direction: TideDirection,
        wind_direction_degrees: f64,
        wave_height_feet: f64,
    ) -> Option<Prediction>;
}

/// reqwest-backed client for the prediction endpoint.
pub struct HttpPredictionService {
    http: reqwest::Client,
    api_url: String,
}

impl HttpPredictionService {
    /// Build from config. Returns `None` when no endpoint is configured,
    /// which disables the prediction leg entirely.
    pub fn from_config(cfg: &PredictionConfig) -> Option<Self> {
        if cfg.api_url.is_empty() {
            return None;
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .ok()?;
        Some(Self {
            http,
            api_url: cfg.api_url.clone(),
        })
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        tide_direction: TideDirection,
        wind_direction_degrees: f64,
        wave_height_feet: f64,
    ) -> Option<Prediction> {
        let tide = match tide_direction {
            TideDirection::Dropping => "FALLING",
            TideDirection::Rising => "RISING",
            TideDirection::Unknown => "UNKNOWN",
        };
        // The SF Bar reading doubles as the Pt Reyes proxy until the second
        // buoy feed is wired up
        let height = format!("{wave_height_feet:.1}");
        let request = PredictionRequest {
            tide,
            wind: quadrant_label(wind_direction_degrees),
            pt_reyes: height.clone(),
            sf_bar: height,
        };

        let response = match self.http.post(&self.api_url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Prediction service unreachable — scoring without it");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "Prediction service returned an error — scoring without it"
            );
            return None;
        }

        match response.json::<PredictionResponse>().await {
            Ok(body) => {
                let prediction = Prediction::from_raw(body.predicted_score);
                debug!(
                    raw = prediction.raw,
                    normalized = prediction.normalized,
                    "Prediction received"
                );
                Some(prediction)
            }
            Err(e) => {
                warn!(error = %e, "Prediction response malformed — scoring without it");
                None
            }
        }
    }
}
