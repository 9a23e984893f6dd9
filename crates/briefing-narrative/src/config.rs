//! Narrative configuration.

use std::time::Duration;

/// Default model for narrative synthesis.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
const MODEL_VAR: &str = "BRIEFING_NARRATIVE_MODEL";
const FALLBACK_MODEL_VAR: &str = "OPENROUTER_MODEL";

/// Settings for [`crate::OpenRouterNarrator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl NarrativeConfig {
    /// Creates a config with default model and limits.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Reads the config from the environment.
    ///
    /// Returns `None` when no API key is set; narrative synthesis is then
    /// simply disabled.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the config through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty())?;
        let model = lookup(MODEL_VAR)
            .or_else(|| lookup(FALLBACK_MODEL_VAR))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Some(Self::new(api_key).with_model(model))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
