use crate::domain::types::TeamStats;
use serde::{Deserialize, Serialize};

/// Ordered list of feature names.
/// This order MUST match the weight columns of every model artifact.
/// Any change here is a breaking change for trained models.
pub const FEATURE_NAMES: &[&str] = &[
    "home_goals_per_game",
    "home_goals_against_per_game",
    "home_win_rate",
    "home_points_per_game",
    "away_goals_per_game",
    "away_goals_against_per_game",
    "away_win_rate",
    "away_points_per_game",
    "goals_diff",
    "defensive_diff",
    "form_diff",
    "points_diff",
];

pub const FEATURE_COUNT: usize = 12;

pub const HOME_GOALS_PER_GAME: usize = 0;
pub const HOME_WIN_RATE: usize = 2;
pub const HOME_POINTS_PER_GAME: usize = 3;
pub const AWAY_GOALS_PER_GAME: usize = 4;
pub const AWAY_WIN_RATE: usize = 6;
pub const AWAY_POINTS_PER_GAME: usize = 7;
pub const POINTS_DIFF: usize = 11;

/// Fixed-length feature vector in `FEATURE_NAMES` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    /// Looks a feature up by registry name.
    pub fn named(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }
}

/// Derives the per-team rates and the relative differentials.
/// Every rate divides by `max(games_played, 1)`.
pub fn extract_features(home: &TeamStats, away: &TeamStats) -> FeatureVector {
    let home_gpg = home.goals_for_per_game();
    let home_gapg = home.goals_against_per_game();
    let home_wr = home.win_rate();
    let home_ppg = home.points_per_game();

    let away_gpg = away.goals_for_per_game();
    let away_gapg = away.goals_against_per_game();
    let away_wr = away.win_rate();
    let away_ppg = away.points_per_game();

    FeatureVector([
        home_gpg,
        home_gapg,
        home_wr,
        home_ppg,
        away_gpg,
        away_gapg,
        away_wr,
        away_ppg,
        home_gpg - away_gpg,
        // Positive when the home side concedes less.
        away_gapg - home_gapg,
        home_wr - away_wr,
        home_ppg - away_ppg,
    ])
}
