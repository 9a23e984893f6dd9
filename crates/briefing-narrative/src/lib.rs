//! Narrative synthesis for the weekly kitchen briefing.
//!
//! Enrichment is best effort: a missing credential is a normal state
//! ([`NarrativeConfig::from_env`] returns `None`), and callers treat any
//! [`NarrativeError`] as "keep the algorithmic summary".

pub mod config;
pub mod error;
pub mod input;
pub mod openrouter;

use async_trait::async_trait;

pub use config::{NarrativeConfig, DEFAULT_MODEL};
pub use error::{NarrativeError, Result};
pub use input::{AgentLine, NarrativeInput};
pub use openrouter::OpenRouterNarrator;

/// Produces a natural-language summary of a briefing.
#[async_trait]
pub trait NarrativeSynthesizer: Send + Sync {
    /// Returns `Ok(None)` when there is nothing to say.
    async fn synthesize(&self, input: &NarrativeInput) -> Result<Option<String>>;
}

/// Normalizes a narrative: trims it and maps blank text to `None`.
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  Busy week ahead.\n"), Some("Busy week ahead.".into()));
        assert_eq!(non_blank(" \n\t"), None);
    }
}
