use crate::domain::types::Outcome;
use serde::{Deserialize, Serialize};

/// Result of comparing a prediction with the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedPrediction {
    pub predicted: Outcome,
    pub actual: Outcome,
    pub correct: bool,
}

pub fn classify_result(home_goals: u32, away_goals: u32) -> Outcome {
    if home_goals > away_goals {
        Outcome::HomeWin
    } else if home_goals < away_goals {
        Outcome::AwayWin
    } else {
        Outcome::Draw
    }
}

pub fn grade(predicted: Outcome, home_goals: u32, away_goals: u32) -> GradedPrediction {
    let actual = classify_result(home_goals, away_goals);
    GradedPrediction {
        predicted,
        actual,
        correct: predicted == actual,
    }
}

/// Hit-rate over a set of graded predictions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Fraction in `[0, 1]`, rounded to 4 decimals.
    pub accuracy: f64,
    /// Percentage, rounded to 2 decimals.
    pub accuracy_pct: f64,
}

impl AccuracyStats {
    pub fn from_graded(graded: &[GradedPrediction]) -> Self {
        if graded.is_empty() {
            return Self::default();
        }

        let total = graded.len();
        let correct = graded.iter().filter(|g| g.correct).count();
        let accuracy = correct as f64 / total as f64;

        Self {
            total,
            correct,
            incorrect: total - correct,
            accuracy: round_to(accuracy, 4),
            accuracy_pct: round_to(accuracy * 100.0, 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
