use crate::domain::types::{ScoreLine, TeamStats};

pub const HOME_GOAL_MULTIPLIER: f64 = 1.10;
pub const AWAY_GOAL_MULTIPLIER: f64 = 0.95;

/// Expected goals per side: average of own attack and opponent defence,
/// scaled by the venue multipliers and rounded to 2 decimals.
pub fn predict_score(home: &TeamStats, away: &TeamStats) -> ScoreLine {
    let home_attack = home.goals_for_per_game();
    let away_defense = away.goals_against_per_game();

    let away_attack = away.goals_for_per_game();
    let home_defense = home.goals_against_per_game();

    ScoreLine {
        home_goals: round2((home_attack + away_defense) / 2.0 * HOME_GOAL_MULTIPLIER),
        away_goals: round2((away_attack + home_defense) / 2.0 * AWAY_GOAL_MULTIPLIER),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
