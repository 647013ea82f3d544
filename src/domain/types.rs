use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Season-to-date record of one team.
///
/// Counts are unsigned so they can never go negative. `games_played` is floored at 1
/// whenever it is used as a divisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamStats {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    pub games_played: u32,
}

impl TeamStats {
    /// Builds a record from results, deriving points (3 per win, 1 per draw) and games played.
    /// Derived totals saturate at `u32::MAX`.
    pub fn from_results(
        wins: u32,
        draws: u32,
        losses: u32,
        goals_for: u32,
        goals_against: u32,
    ) -> Self {
        Self {
            wins,
            draws,
            losses,
            goals_for,
            goals_against,
            points: wins.saturating_mul(3).saturating_add(draws),
            games_played: wins.saturating_add(draws).saturating_add(losses),
        }
    }

    pub fn games(&self) -> f64 {
        self.games_played.max(1) as f64
    }

    fn per_game(&self, stat: u32) -> f64 {
        stat as f64 / self.games()
    }

    pub fn goals_for_per_game(&self) -> f64 {
        self.per_game(self.goals_for)
    }

    pub fn goals_against_per_game(&self) -> f64 {
        self.per_game(self.goals_against)
    }

    pub fn win_rate(&self) -> f64 {
        self.per_game(self.wins)
    }

    pub fn points_per_game(&self) -> f64 {
        self.per_game(self.points)
    }
}

/// The three match results, in the fixed home/draw/away order used everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin];

    /// Single-letter code used by result feeds (`H`, `D`, `A`).
    pub fn code(&self) -> char {
        match self {
            Outcome::HomeWin => 'H',
            Outcome::Draw => 'D',
            Outcome::AwayWin => 'A',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'H' => Some(Outcome::HomeWin),
            'D' => Some(Outcome::Draw),
            'A' => Some(Outcome::AwayWin),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::HomeWin => write!(f, "home win"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::AwayWin => write!(f, "away win"),
        }
    }
}

/// Bookmaker decimal odds for the three outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsTriple {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OddsTriple {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away,
        }
    }
}

/// Three-way outcome distribution. Constructed once per prediction and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbabilities {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    /// Divides each weight by the total. A non-positive total yields the uniform distribution.
    pub fn normalized(home: f64, draw: f64, away: f64) -> Self {
        let total = home + draw + away;
        if total > 0.0 && total.is_finite() {
            Self::new(home / total, draw / total, away / total)
        } else {
            Self::uniform()
        }
    }

    pub fn uniform() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away,
        }
    }

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.sum() - 1.0).abs() <= tolerance
            && Outcome::ALL
                .iter()
                .all(|o| (0.0..=1.0).contains(&self.get(*o)))
    }

    /// First outcome holding the maximum probability, scanning home, draw, away.
    pub fn argmax(&self) -> Outcome {
        let mut best = Outcome::HomeWin;
        for outcome in [Outcome::Draw, Outcome::AwayWin] {
            if self.get(outcome) > self.get(best) {
                best = outcome;
            }
        }
        best
    }

    pub fn max_probability(&self) -> f64 {
        self.home.max(self.draw).max(self.away)
    }
}

/// Expected goals for each side, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home_goals: f64,
    pub away_goals: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    High,
    Moderate,
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLabel::High => write!(f, "high"),
            ConfidenceLabel::Moderate => write!(f, "moderate"),
        }
    }
}

/// Whether usable team statistics backed a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Complete,
    Missing,
}

impl DataQuality {
    /// Data is missing when both compared proxies are exactly zero.
    pub fn from_proxies(home: f64, away: f64) -> Self {
        if home == 0.0 && away == 0.0 {
            DataQuality::Missing
        } else {
            DataQuality::Complete
        }
    }

    pub fn from_stats(home: &TeamStats, away: &TeamStats) -> Self {
        Self::from_proxies(home.points_per_game(), away.points_per_game())
    }
}

/// Confidence on both scales: the 0-1 raw probability and the 0-10 AI score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub label: ConfidenceLabel,
    pub raw: f64,
    pub ai_score: f64,
    pub quality: DataQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetAdvice {
    StrongRecommendation,
    SmallStake,
    NoClearValue,
    WatchOnly,
}

impl BetAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            BetAdvice::StrongRecommendation => "strong recommendation",
            BetAdvice::SmallStake => "small stake suggested",
            BetAdvice::NoClearValue => "predicted but no clear value",
            BetAdvice::WatchOnly => "unpredictable, advise watching only",
        }
    }
}

/// Rating-scale value of backing one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRating {
    pub outcome: Outcome,
    pub model_probability: f64,
    pub implied_probability: f64,
    /// `(model - implied) * 10`, unclamped.
    pub value: f64,
    /// `value` clamped to `[0, 10]`.
    pub rating: f64,
    pub advice: BetAdvice,
    pub advice_text: String,
}

/// Model-over-market ratio per outcome. Above 1.0 the model thinks the price is too long.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRatios {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeRatios {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away,
        }
    }
}

/// Value assessment against market odds. Ratios and rating are absent when no odds were listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAssessment {
    pub ratios: Option<OutcomeRatios>,
    pub overall: Option<ValueRating>,
    pub insight: String,
}

/// Sparse diagnostics describing how a probability triple was produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub method: String,
    pub values: BTreeMap<String, f64>,
}

impl FeatureSummary {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

pub const RULE_BASED_SOURCE: &str = "rule-based";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    /// Provider name, or `rule-based` for the deterministic fallback.
    pub source: String,
}

impl Narrative {
    pub fn is_fallback(&self) -> bool {
        self.source == RULE_BASED_SOURCE
    }
}

/// Terminal artifact of one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home_team: String,
    pub away_team: String,
    pub probabilities: OutcomeProbabilities,
    pub predicted: Outcome,
    pub confidence: ConfidenceAssessment,
    pub score: Option<ScoreLine>,
    pub feature_summary: FeatureSummary,
    pub value: ValueAssessment,
    pub narrative: Option<Narrative>,
    pub model_name: String,
    pub model_version: String,
}

/// Plain input handed over by the HTTP or persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub home_name: String,
    pub away_name: String,
    #[serde(default)]
    pub home_stats: TeamStats,
    #[serde(default)]
    pub away_stats: TeamStats,
    #[serde(default)]
    pub odds: Option<OddsTriple>,
}
