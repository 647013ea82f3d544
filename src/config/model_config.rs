//! Model slot configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Trained-model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub primary_model_path: Option<PathBuf>,
    pub secondary_model_path: Option<PathBuf>,
    /// Default ensembling flag for full-pipeline predictions.
    pub use_ensemble: bool,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            primary_model_path: None,
            secondary_model_path: None,
            use_ensemble: true,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            primary_model_path: Self::parse_path("PRIMARY_MODEL_PATH"),
            secondary_model_path: Self::parse_path("SECONDARY_MODEL_PATH"),
            use_ensemble: Self::parse_bool("USE_ENSEMBLE", true)?,
        })
    }

    /// Configured artifact paths in slot order (primary first).
    pub fn model_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.primary_model_path
            .iter()
            .chain(self.secondary_model_path.iter())
    }

    fn parse_path(key: &str) -> Option<PathBuf> {
        env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_bool(key: &str, default: bool) -> Result<bool> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .trim()
            .to_lowercase()
            .parse::<bool>()
            .context(format!("Failed to parse {}", key))
    }
}
