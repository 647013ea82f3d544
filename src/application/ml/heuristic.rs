//! Rule-based outcome probabilities, used whenever no trained model produced an output.
//!
//! The constants are fixed; the result is reproducible bit for bit.

use crate::domain::types::{OutcomeProbabilities, TeamStats};

pub const BASE_HOME: f64 = 0.35;
pub const BASE_DRAW: f64 = 0.30;
pub const BASE_AWAY: f64 = 0.35;
pub const HOME_ADVANTAGE: f64 = 0.15;
/// Points-per-game gap beyond which one side counts as clearly stronger.
pub const STRENGTH_THRESHOLD: f64 = 0.5;

pub fn heuristic_probabilities(home: &TeamStats, away: &TeamStats) -> OutcomeProbabilities {
    let strength_diff = home.points_per_game() - away.points_per_game();

    let (home_win, draw, away_win) = if strength_diff > STRENGTH_THRESHOLD {
        (
            BASE_HOME + 0.2 + HOME_ADVANTAGE,
            BASE_DRAW - 0.1,
            BASE_AWAY - 0.1,
        )
    } else if strength_diff < -STRENGTH_THRESHOLD {
        (
            BASE_HOME - 0.1 + HOME_ADVANTAGE,
            BASE_DRAW - 0.05,
            BASE_AWAY + 0.15,
        )
    } else {
        (BASE_HOME + HOME_ADVANTAGE, BASE_DRAW, BASE_AWAY - HOME_ADVANTAGE)
    };

    let total = home_win + draw + away_win;
    OutcomeProbabilities::new(home_win / total, draw / total, away_win / total)
}
