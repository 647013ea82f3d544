use crate::domain::types::{
    ConfidenceAssessment, ConfidenceLabel, DataQuality, OutcomeProbabilities,
};

pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.5;
pub const MISSING_DATA_PENALTY: f64 = 0.7;
pub const AI_SCORE_MAX: f64 = 10.0;

pub fn confidence_label(max_probability: f64) -> ConfidenceLabel {
    if max_probability > HIGH_CONFIDENCE_THRESHOLD {
        ConfidenceLabel::High
    } else {
        ConfidenceLabel::Moderate
    }
}

/// 0-10 score: `confidence * 10`, penalised when no usable team data backed it.
pub fn ai_score(confidence: f64, quality: DataQuality) -> f64 {
    let quality_factor = match quality {
        DataQuality::Complete => 1.0,
        DataQuality::Missing => MISSING_DATA_PENALTY,
    };
    (confidence * AI_SCORE_MAX * quality_factor).clamp(0.0, AI_SCORE_MAX)
}

pub fn score_confidence(
    probabilities: &OutcomeProbabilities,
    quality: DataQuality,
) -> ConfidenceAssessment {
    let raw = probabilities.max_probability();
    ConfidenceAssessment {
        label: confidence_label(raw),
        raw,
        ai_score: ai_score(raw, quality),
        quality,
    }
}
