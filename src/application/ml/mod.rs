pub mod forest_predictor;
pub mod heuristic;
pub mod outcome_model;
pub mod predictor;

pub use forest_predictor::{ForestArtifact, ForestPredictor};
pub use outcome_model::{OutcomePrediction, OutcomeProbabilityModel, PredictionMethod};
pub use predictor::OutcomePredictor;
