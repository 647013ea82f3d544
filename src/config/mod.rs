//! Configuration module for matchcast.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: trained-model slots and the narrative provider.

mod model_config;
mod narrative_config;

pub use model_config::ModelEnvConfig;
pub use narrative_config::{
    DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL, NarrativeEnvConfig, PLACEHOLDER_API_KEY,
};

use anyhow::{Context, Result};

/// Engine configuration, constructed once at startup and passed into the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub model: ModelEnvConfig,
    pub narrative: NarrativeEnvConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let model = ModelEnvConfig::from_env().context("Failed to load model config")?;
        let narrative =
            NarrativeEnvConfig::from_env().context("Failed to load narrative config")?;

        Ok(Self { model, narrative })
    }
}
