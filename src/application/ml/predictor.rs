use crate::domain::errors::ModelError;
use crate::domain::ml::FeatureVector;
use crate::domain::types::OutcomeProbabilities;

/// Interface for trained outcome models
pub trait OutcomePredictor: Send + Sync {
    /// Predict the home/draw/away distribution.
    /// Implementations return a triple that already sums to 1.
    fn predict(&self, features: &FeatureVector) -> Result<OutcomeProbabilities, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
