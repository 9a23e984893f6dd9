//! Narrative synthesis through the OpenRouter chat-completions API.

use async_trait::async_trait;
use tracing::debug;

use crate::config::NarrativeConfig;
use crate::error::{NarrativeError, Result};
use crate::input::NarrativeInput;
use crate::{non_blank, NarrativeSynthesizer};

/// OpenRouter API endpoint.
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// System prompt for the narrator.
const SYSTEM_PROMPT: &str = r#"You write the weekly operations briefing for a professional kitchen.
You receive the outcome of several analysis agents and a prioritized action list.

Rules:
- 3-6 sentences, plain prose, no headings
- Lead with the HIGH priority items, then the week's shape (demand, waste, rotation)
- Mention failed analyses only if they leave a gap the chef should know about
- Never invent numbers that are not in the input"#;

/// Narrator backed by OpenRouter.
pub struct OpenRouterNarrator {
    client: reqwest::Client,
    config: NarrativeConfig,
}

impl OpenRouterNarrator {
    /// Creates a narrator with its own HTTP client.
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(NarrativeError::NoApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NarrativeError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Creates a narrator from the environment, if a key is configured.
    pub fn from_env() -> Result<Option<Self>> {
        NarrativeConfig::from_env().map(Self::new).transpose()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body(&self, input: &NarrativeInput) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": input.to_prompt()}
            ],
            "max_tokens": self.config.max_tokens
        })
    }
}

#[async_trait]
impl NarrativeSynthesizer for OpenRouterNarrator {
    async fn synthesize(&self, input: &NarrativeInput) -> Result<Option<String>> {
        debug!(model = %self.config.model, location = %input.location_slug, "requesting narrative");

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(input))
            .send()
            .await
            .map_err(|e| NarrativeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NarrativeError::ParseError(e.to_string()))?;

        if !status.is_success() {
            let message = json["error"]["message"]
                .as_str()
                .unwrap_or("no error message");
            return Err(NarrativeError::RequestFailed(format!("{}: {}", status, message)));
        }

        parse_completion(&json)
    }
}

/// Extracts the narrative from a chat-completions response body.
pub fn parse_completion(json: &serde_json::Value) -> Result<Option<String>> {
    if let Some(message) = json["error"]["message"].as_str() {
        return Err(NarrativeError::RequestFailed(message.to_string()));
    }

    json["choices"][0]["message"]["content"]
        .as_str()
        .map(non_blank)
        .ok_or_else(|| NarrativeError::ParseError("No content in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_completion_content() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "  Two urgent items this week.  "}}]
        });
        assert_eq!(
            parse_completion(&body).unwrap(),
            Some("Two urgent items this week.".to_string())
        );
    }

    #[test]
    fn test_parse_completion_blank_is_none() {
        let body = json!({"choices": [{"message": {"content": "\n"}}]});
        assert_eq!(parse_completion(&body).unwrap(), None);
    }

    #[test]
    fn test_parse_completion_errors() {
        let body = json!({"error": {"message": "Rate limit exceeded", "code": 429}});
        assert!(matches!(
            parse_completion(&body),
            Err(NarrativeError::RequestFailed(ref m)) if m == "Rate limit exceeded"
        ));

        let body = json!({"choices": []});
        assert!(matches!(parse_completion(&body), Err(NarrativeError::ParseError(_))));
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            OpenRouterNarrator::new(NarrativeConfig::new("")),
            Err(NarrativeError::NoApiKey)
        ));
    }

    #[test]
    fn test_request_body_uses_config() {
        let narrator =
            OpenRouterNarrator::new(NarrativeConfig::new("sk-test").with_max_tokens(200)).unwrap();
        let input = NarrativeInput {
            location_slug: "harbour-st".into(),
            week_start: chrono::NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            week_end: chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            agents: vec![],
            actions: vec![],
            algorithmic_summary: "0 agent results".into(),
        };

        let body = narrator.request_body(&input);
        assert_eq!(body["max_tokens"], 200);
        assert_eq!(body["model"], crate::DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
    }
}
