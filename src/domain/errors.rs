use crate::domain::types::Outcome;
use thiserror::Error;

/// Errors surfaced by the prediction pipeline.
///
/// Only `InvalidOdds` ever reaches a caller; `ModelUnavailable` is raised internally
/// and absorbed by the outcome model, which degrades to a single model or the heuristic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid {outcome} odds: {odds} (decimal odds must be positive and finite)")]
    InvalidOdds { outcome: Outcome, odds: f64 },

    #[error("Model unavailable: ensemble needs {required} model outputs, {loaded} available")]
    ModelUnavailable { required: usize, loaded: usize },
}

/// Errors raised by a loaded outcome model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Model artifact {path} could not be loaded: {reason}")]
    Artifact { path: String, reason: String },

    #[error("Model artifact shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Inference failed in {model}: {reason}")]
    Inference { model: String, reason: String },

    #[error("Training failed: {reason}")]
    Training { reason: String },
}

/// Errors from an external narrative provider. Always recovered by the rule-based fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NarrativeProviderError {
    #[error("Narrative request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Narrative provider returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Narrative provider timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    #[error("Narrative provider returned an empty completion")]
    EmptyCompletion,
}
