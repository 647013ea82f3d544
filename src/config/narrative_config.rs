//! Narrative provider configuration parsing from environment variables.
//!
//! The provider speaks the OpenAI chat-completions protocol, so any compatible
//! endpoint can be configured through the base URL.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-70b-versatile";
/// Key value shipped in sample `.env` files. Treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Narrative provider environment configuration
#[derive(Debug, Clone)]
pub struct NarrativeEnvConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for NarrativeEnvConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_secs: 15,
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

impl NarrativeEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            api_key: env::var("LLM_API_KEY").ok(),
            base_url: env::var("LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            timeout_secs: Self::parse_u64("LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
            temperature: Self::parse_f64("LLM_TEMPERATURE", defaults.temperature)?,
            max_tokens: Self::parse_u32("LLM_MAX_TOKENS", defaults.max_tokens)?,
        })
    }

    /// A usable key is present: not empty and not the sample placeholder.
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_deref()
            .map(str::trim)
            .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_u32(key: &str, default: u32) -> Result<u32> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u32>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_f64(key: &str, default: f64) -> Result<f64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<f64>()
            .context(format!("Failed to parse {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: Option<&str>) -> NarrativeEnvConfig {
        NarrativeEnvConfig {
            api_key: key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_disabled_without_usable_key() {
        assert!(!with_key(None).is_enabled());
        assert!(!with_key(Some("")).is_enabled());
        assert!(!with_key(Some("   ")).is_enabled());
        assert!(!with_key(Some(PLACEHOLDER_API_KEY)).is_enabled());
        assert!(with_key(Some("gsk_live_key")).is_enabled());
    }

    #[test]
    fn test_defaults() {
        let config = NarrativeEnvConfig::default();
        assert_eq!(config.base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.model, DEFAULT_LLM_MODEL);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.max_tokens, 500);
    }
}
