use super::heuristic::heuristic_probabilities;
use super::predictor::OutcomePredictor;
use super::forest_predictor::ForestPredictor;
use crate::config::ModelEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::{
    AWAY_GOALS_PER_GAME, AWAY_WIN_RATE, HOME_GOALS_PER_GAME, HOME_WIN_RATE, POINTS_DIFF,
};
use crate::domain::ml::{FeatureVector, extract_features};
use crate::domain::types::{FeatureSummary, OutcomeProbabilities, TeamStats};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const HEURISTIC_METHOD: &str = "heuristic";
pub const ENSEMBLE_METHOD: &str = "ensemble";
pub const HEURISTIC_VERSION: &str = "rules-1";

/// How a probability triple was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionMethod {
    Heuristic,
    Model { name: String, version: String },
    Ensemble { members: Vec<String> },
}

impl PredictionMethod {
    pub fn name(&self) -> &str {
        match self {
            PredictionMethod::Heuristic => HEURISTIC_METHOD,
            PredictionMethod::Model { name, .. } => name,
            PredictionMethod::Ensemble { .. } => ENSEMBLE_METHOD,
        }
    }

    pub fn version(&self) -> String {
        match self {
            PredictionMethod::Heuristic => HEURISTIC_VERSION.to_string(),
            PredictionMethod::Model { version, .. } => version.clone(),
            PredictionMethod::Ensemble { members } => members.join("+"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomePrediction {
    pub probabilities: OutcomeProbabilities,
    pub method: PredictionMethod,
    pub summary: FeatureSummary,
}

/// Produces outcome probabilities from whichever trained models were registered at startup,
/// falling back to the heuristic when none are loaded or none produce an output.
///
/// Predictors are read-only after construction, so one instance can be shared across tasks.
#[derive(Clone, Default)]
pub struct OutcomeProbabilityModel {
    predictors: Vec<Arc<dyn OutcomePredictor>>,
}

impl OutcomeProbabilityModel {
    /// Heuristic-only model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Predictors in priority order: the first is the primary slot.
    pub fn with_predictors(predictors: Vec<Arc<dyn OutcomePredictor>>) -> Self {
        Self { predictors }
    }

    /// Loads the configured artifacts. A slot whose artifact cannot be loaded stays empty.
    pub fn from_config(config: &ModelEnvConfig) -> Self {
        let mut predictors: Vec<Arc<dyn OutcomePredictor>> = Vec::new();
        for path in config.model_paths() {
            if !path.exists() {
                warn!(
                    "Model artifact not found at {:?}. Slot stays empty.",
                    path
                );
                continue;
            }
            match ForestPredictor::load(path) {
                Ok(predictor) => predictors.push(Arc::new(predictor)),
                Err(e) => error!("Failed to load model artifact: {}", e),
            }
        }
        Self { predictors }
    }

    pub fn has_trained_model(&self) -> bool {
        !self.predictors.is_empty()
    }

    pub fn loaded_models(&self) -> Vec<String> {
        self.predictors.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn predict(
        &self,
        home: &TeamStats,
        away: &TeamStats,
        use_ensemble: bool,
    ) -> OutcomePrediction {
        let features = extract_features(home, away);

        match self.predict_features(&features, use_ensemble) {
            Some((probabilities, method)) => OutcomePrediction {
                summary: model_summary(&features, &method),
                probabilities,
                method,
            },
            None => OutcomePrediction {
                probabilities: heuristic_probabilities(home, away),
                method: PredictionMethod::Heuristic,
                summary: heuristic_summary(&features, home, away),
            },
        }
    }

    /// Runs the registered models. `None` means the caller must use the heuristic.
    pub fn predict_features(
        &self,
        features: &FeatureVector,
        use_ensemble: bool,
    ) -> Option<(OutcomeProbabilities, PredictionMethod)> {
        if self.predictors.is_empty() {
            return None;
        }

        if !use_ensemble {
            // Single-model mode: first predictor in priority order that answers.
            return self.predictors.iter().find_map(|predictor| {
                match predictor.predict(features) {
                    Ok(probs) => Some((probs, model_method(predictor.as_ref()))),
                    Err(e) => {
                        warn!("Model {} failed, trying next slot: {}", predictor.name(), e);
                        None
                    }
                }
            });
        }

        let mut outputs = Vec::with_capacity(self.predictors.len());
        for predictor in &self.predictors {
            match predictor.predict(features) {
                Ok(probs) => outputs.push((predictor.as_ref(), probs)),
                Err(e) => warn!("Model {} failed, skipping: {}", predictor.name(), e),
            }
        }

        match ensemble_mean(&outputs.iter().map(|(_, p)| *p).collect::<Vec<_>>()) {
            Ok(mean) => {
                let members = outputs.iter().map(|(p, _)| p.name().to_string()).collect();
                return Some((mean, PredictionMethod::Ensemble { members }));
            }
            Err(e) => debug!("{}; degrading to single model", e),
        }

        outputs
            .first()
            .map(|(predictor, probs)| (*probs, model_method(*predictor)))
    }
}

fn model_method(predictor: &dyn OutcomePredictor) -> PredictionMethod {
    PredictionMethod::Model {
        name: predictor.name().to_string(),
        version: predictor.version().to_string(),
    }
}

/// Per-class arithmetic mean of at least two model outputs. Not re-normalized: each
/// input already sums to 1, so the mean does too.
pub fn ensemble_mean(
    outputs: &[OutcomeProbabilities],
) -> Result<OutcomeProbabilities, PredictionError> {
    if outputs.len() < 2 {
        return Err(PredictionError::ModelUnavailable {
            required: 2,
            loaded: outputs.len(),
        });
    }

    let n = outputs.len() as f64;
    let (home, draw, away) = outputs.iter().fold((0.0, 0.0, 0.0), |acc, p| {
        (acc.0 + p.home, acc.1 + p.draw, acc.2 + p.away)
    });
    Ok(OutcomeProbabilities::new(home / n, draw / n, away / n))
}

fn model_summary(features: &FeatureVector, method: &PredictionMethod) -> FeatureSummary {
    let mut summary = FeatureSummary {
        method: method.name().to_string(),
        ..Default::default()
    };
    for (key, index) in [
        ("home_goals_per_game", HOME_GOALS_PER_GAME),
        ("away_goals_per_game", AWAY_GOALS_PER_GAME),
        ("home_win_rate", HOME_WIN_RATE),
        ("away_win_rate", AWAY_WIN_RATE),
        ("points_difference", POINTS_DIFF),
    ] {
        summary.values.insert(key.to_string(), features.get(index));
    }
    summary
}

fn heuristic_summary(
    features: &FeatureVector,
    home: &TeamStats,
    away: &TeamStats,
) -> FeatureSummary {
    let mut summary = model_summary(features, &PredictionMethod::Heuristic);
    let home_ppg = home.points_per_game();
    let away_ppg = away.points_per_game();
    summary
        .values
        .insert("home_points_per_game".to_string(), home_ppg);
    summary
        .values
        .insert("away_points_per_game".to_string(), away_ppg);
    summary
        .values
        .insert("strength_difference".to_string(), home_ppg - away_ppg);
    summary
}
