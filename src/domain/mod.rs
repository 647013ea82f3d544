// Core match and prediction values
pub mod types;

// Feature derivation for outcome models
pub mod ml;

// Port interfaces
pub mod narrative;

// Prediction grading against final scores
pub mod accuracy;

// Domain-specific error types
pub mod errors;
