use super::predictor::OutcomePredictor;
use crate::domain::errors::ModelError;
use crate::domain::ml::{FEATURE_NAMES, FeatureVector};
use crate::domain::types::{Outcome, OutcomeProbabilities};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

pub type OutcomeForest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// On-disk form of a trained outcome model: one-vs-rest random forests, one per outcome,
/// each regressing the 0/1 indicator of its outcome.
#[derive(Serialize, Deserialize)]
pub struct ForestArtifact {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    /// Column names the forests were trained against; checked against the registry when present.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub home: OutcomeForest,
    pub draw: OutcomeForest,
    pub away: OutcomeForest,
}

pub struct ForestPredictor {
    artifact: ForestArtifact,
}

impl ForestPredictor {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact_err = |reason: String| ModelError::Artifact {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| artifact_err(e.to_string()))?;
        let artifact: ForestArtifact = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| artifact_err(e.to_string()))?;
        let predictor = Self::from_artifact(artifact)?;

        info!(
            "Loaded outcome model {} {} from {:?} (trained_at: {:?})",
            predictor.artifact.name,
            predictor.artifact.version,
            path,
            predictor.artifact.trained_at
        );
        Ok(predictor)
    }

    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelError> {
        if let Some(names) = &artifact.feature_names
            && names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied())
        {
            return Err(ModelError::ShapeMismatch {
                expected: FEATURE_NAMES.join(","),
                actual: names.join(","),
            });
        }
        Ok(Self { artifact })
    }

    /// Fits one forest per outcome on labelled feature rows.
    pub fn train(
        name: &str,
        version: &str,
        samples: &[(FeatureVector, Outcome)],
        params: RandomForestRegressorParameters,
    ) -> Result<Self, ModelError> {
        if samples.is_empty() {
            return Err(ModelError::Training {
                reason: "no training samples".to_string(),
            });
        }

        let rows: Vec<Vec<f64>> = samples
            .iter()
            .map(|(f, _)| f.as_slice().to_vec())
            .collect();
        let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| ModelError::Training {
            reason: format!("Matrix error: {}", e),
        })?;

        let fit = |outcome: Outcome| -> Result<OutcomeForest, ModelError> {
            let y: Vec<f64> = samples
                .iter()
                .map(|(_, o)| if *o == outcome { 1.0 } else { 0.0 })
                .collect();
            RandomForestRegressor::fit(&x, &y, params.clone()).map_err(|e| {
                ModelError::Training {
                    reason: format!("{} forest: {}", outcome, e),
                }
            })
        };

        let artifact = ForestArtifact {
            name: name.to_string(),
            version: version.to_string(),
            trained_at: Some(Utc::now()),
            feature_names: Some(FEATURE_NAMES.iter().map(|n| n.to_string()).collect()),
            home: fit(Outcome::HomeWin)?,
            draw: fit(Outcome::Draw)?,
            away: fit(Outcome::AwayWin)?,
        };
        info!("Trained outcome model {} on {} samples", name, samples.len());
        Ok(Self { artifact })
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let artifact_err = |reason: String| ModelError::Artifact {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| artifact_err(e.to_string()))?;
        }
        let file = File::create(path).map_err(|e| artifact_err(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), &self.artifact)
            .map_err(|e| artifact_err(e.to_string()))?;
        info!("Saved outcome model {} to {:?}", self.artifact.name, path);
        Ok(())
    }

    fn class_score(
        &self,
        forest: &OutcomeForest,
        input: &DenseMatrix<f64>,
    ) -> Result<f64, ModelError> {
        let predictions = forest
            .predict(input)
            .map_err(|e| self.inference_err(e.to_string()))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| self.inference_err("no prediction returned".to_string()))
    }

    fn inference_err(&self, reason: String) -> ModelError {
        ModelError::Inference {
            model: self.artifact.name.clone(),
            reason,
        }
    }
}

impl OutcomePredictor for ForestPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<OutcomeProbabilities, ModelError> {
        let input = DenseMatrix::from_2d_vec(&vec![features.as_slice().to_vec()])
            .map_err(|e| self.inference_err(format!("Matrix creation failed: {}", e)))?;

        // Indicator regressions can stray slightly outside [0, 1].
        let home = self.class_score(&self.artifact.home, &input)?.max(0.0);
        let draw = self.class_score(&self.artifact.draw, &input)?.max(0.0);
        let away = self.class_score(&self.artifact.away, &input)?.max(0.0);

        let total = home + draw + away;
        if !total.is_finite() || total <= 0.0 {
            return Err(self.inference_err(format!(
                "degenerate class scores (total {})",
                total
            )));
        }
        Ok(OutcomeProbabilities::new(home / total, draw / total, away / total))
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn version(&self) -> &str {
        &self.artifact.version
    }
}
