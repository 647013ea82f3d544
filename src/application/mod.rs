// Outcome models: heuristic, trained artifacts, ensembling
pub mod ml;

// Numeric components
pub mod confidence;
pub mod odds;
pub mod score_predictor;
pub mod value_bet;

// Narrative generation with provider fallback
pub mod narrative;

// Facade exposing the operation set and full pipelines
pub mod engine;

pub use engine::{PredictOptions, PredictionEngine};
