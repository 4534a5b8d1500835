//! Enhancement Client — HTTP client for the external text-enhancement service
//!
//! Speaks the chat-completions shape through whatever gateway is configured.
//! Missing credentials is a normal "not configured" outcome surfaced as a
//! typed error the pipeline maps to its fallback taxonomy; it is never a
//! fault.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EnhancementConfig;
use crate::types::ConditionsSnapshot;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "SURFSENSE_ENHANCE_KEY";

/// Typed failures from the enhancement call. All of them degrade to the
/// rule-based narrative downstream.
#[derive(Debug, thiserror::Error)]
pub enum EnhancementError {
    #[error("enhancement service not configured")]
    NotConfigured,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("service returned empty content")]
    Empty,
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Seam for the external text-enhancement service.
#[async_trait]
pub trait EnhancementClient: Send + Sync {
    /// Enhance the narrative given its numeric context. Returns the raw
    /// enhanced text; length validation happens in the pipeline.
    async fn enhance(
        &self,
        narrative: &str,
        snapshot: &ConditionsSnapshot,
    ) -> Result<String, EnhancementError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

// ============================================================================
// HTTP client
// ============================================================================

/// reqwest-backed enhancement client.
pub struct HttpEnhancementClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl HttpEnhancementClient {
    /// Build from config, resolving the API key from the config value or the
    /// `SURFSENSE_ENHANCE_KEY` environment variable. A missing key still
    /// produces a client; every call then reports `NotConfigured`.
    pub fn from_config(cfg: &EnhancementConfig) -> Self {
        let api_key = if cfg.api_key.is_empty() {
            std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
        } else {
            Some(cfg.api_key.clone())
        };
        // Transport timeout slightly above the pipeline's hard ceiling; the
        // pipeline timer is the one that fires first and decides the outcome
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs + 5))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_url: cfg.api_url.clone(),
            api_key,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        }
    }

    fn build_prompt(narrative: &str, snapshot: &ConditionsSnapshot) -> String {
        format!(
            "You are a grumpy surf report editor who's really into crystals and haiku \
             poetry. Based on the surf conditions provided, punch up the summary while \
             keeping it accurate and under two sentences.\n\
             \n\
             Surf data context:\n\
             - Wave height: {:.1}ft\n\
             - Wave period: {:.1}s\n\
             - Wind speed: {:.1}kts\n\
             - Wind direction: {:.0}°\n\
             - Current conditions summary: \"{narrative}\"\n\
             \n\
             Keep it authentic to surf culture. No extra text, explanations, or formatting.",
            snapshot.wave_height_feet,
            snapshot.wave_period_seconds,
            snapshot.wind_speed_knots,
            snapshot.wind_direction_degrees,
        )
    }
}

#[async_trait]
impl EnhancementClient for HttpEnhancementClient {
    async fn enhance(
        &self,
        narrative: &str,
        snapshot: &ConditionsSnapshot,
    ) -> Result<String, EnhancementError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(EnhancementError::NotConfigured);
        };

        let prompt = Self::build_prompt(narrative, snapshot);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content:
                        "You are a grumpy surf report editor who ensures surf summaries are \
                         grammatically correct and readable while maintaining their authentic \
                         surf culture voice.",
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnhancementError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnhancementError::Malformed(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(EnhancementError::Empty);
        }

        debug!(
            input_len = narrative.len(),
            output_len = content.len(),
            "Enhancement response received"
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ConditionsSnapshot {
        ConditionsSnapshot {
            wave_height_feet: 6.0,
            wave_period_seconds: 15.0,
            wind_speed_knots: 5.0,
            wind_direction_degrees: 90.0,
        }
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let cfg = EnhancementConfig {
            api_key: String::new(),
            ..EnhancementConfig::default()
        };
        // Only meaningful when the env var is absent, which is the test default
        if std::env::var(API_KEY_ENV).is_ok() {
            return;
        }
        let client = HttpEnhancementClient::from_config(&cfg);
        let err = client
            .enhance("summary", &snapshot())
            .await
            .expect_err("no key configured");
        assert!(matches!(err, EnhancementError::NotConfigured));
    }

    #[test]
    fn prompt_includes_context_numbers() {
        let prompt = HttpEnhancementClient::build_prompt("the summary", &snapshot());
        assert!(prompt.contains("6.0ft"));
        assert!(prompt.contains("15.0s"));
        assert!(prompt.contains("5.0kts"));
        assert!(prompt.contains("the summary"));
    }

    #[test]
    fn response_parsing_takes_first_choice() {
        let json = r#"{"choices":[{"message":{"content":"  enhanced!  "}}]}"#;
        let body: ChatResponse = serde_json::from_str(json).expect("parse");
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        assert_eq!(content, "enhanced!");
    }

    #[test]
    fn empty_choices_parse_to_empty_content() {
        let json = r#"{"choices":[]}"#;
        let body: ChatResponse = serde_json::from_str(json).expect("parse");
        assert!(body.choices.is_empty());
    }
}
