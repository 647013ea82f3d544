//! Model probability versus market price.
//!
//! Two scales coexist: the ratio form (`model / implied`) feeds the insight text, the
//! rating form (`(model - implied) * 10`) feeds stored ratings and advice.

use super::odds::OddsConverter;
use crate::domain::errors::PredictionError;
use crate::domain::types::{
    BetAdvice, OddsTriple, Outcome, OutcomeProbabilities, OutcomeRatios, ValueAssessment,
    ValueRating,
};

/// Ratio above which an outcome is flagged in the insight text.
pub const VALUE_RATIO_THRESHOLD: f64 = 1.1;
pub const VALUE_SCALE: f64 = 10.0;

pub const NO_ODDS_INSIGHT: &str = "No betting odds available for analysis.";
pub const NO_VALUE_INSIGHT: &str = "No significant value bets identified based on current odds.";

/// `model / implied`. Zero when either input is non-positive.
pub fn value_ratio(model_probability: f64, odds: f64) -> f64 {
    if model_probability <= 0.0 || odds <= 0.0 {
        return 0.0;
    }
    let implied_probability = 1.0 / odds;
    model_probability / implied_probability
}

pub fn outcome_ratios(probabilities: &OutcomeProbabilities, odds: &OddsTriple) -> OutcomeRatios {
    OutcomeRatios {
        home: value_ratio(probabilities.home, odds.home),
        draw: value_ratio(probabilities.draw, odds.draw),
        away: value_ratio(probabilities.away, odds.away),
    }
}

pub fn betting_insight(probabilities: &OutcomeProbabilities, odds: Option<&OddsTriple>) -> String {
    let Some(odds) = odds else {
        return NO_ODDS_INSIGHT.to_string();
    };

    let ratios = outcome_ratios(probabilities, odds);
    let insights: Vec<String> = Outcome::ALL
        .iter()
        .filter(|o| ratios.get(**o) > VALUE_RATIO_THRESHOLD)
        .map(|o| {
            format!(
                "{} shows value ({:.2}x expected return)",
                capitalized(*o),
                ratios.get(*o)
            )
        })
        .collect();

    if insights.is_empty() {
        return NO_VALUE_INSIGHT.to_string();
    }
    format!("Betting insights: {}", insights.join("; "))
}

pub fn classify_advice(value: f64, confidence: f64) -> BetAdvice {
    if value > 0.8 && confidence > 0.6 {
        BetAdvice::StrongRecommendation
    } else if value > 0.3 && confidence > 0.5 {
        BetAdvice::SmallStake
    } else if confidence > 0.5 {
        BetAdvice::NoClearValue
    } else {
        BetAdvice::WatchOnly
    }
}

pub fn advice_text(advice: BetAdvice, outcome: Outcome, confidence: f64) -> String {
    match advice {
        BetAdvice::StrongRecommendation => format!(
            "Strong recommendation: back {} (confidence {:.1}%)",
            outcome,
            confidence * 100.0
        ),
        BetAdvice::SmallStake => format!(
            "Small stake suggested on {} (confidence {:.1}%)",
            outcome,
            confidence * 100.0
        ),
        BetAdvice::NoClearValue => format!("Predicted {}, but no clear betting value", outcome),
        BetAdvice::WatchOnly => "Hard to call, advise watching only".to_string(),
    }
}

/// Rating-scale value of backing `outcome`, judged with the distribution's top probability
/// as confidence.
pub fn rate_outcome(
    probabilities: &OutcomeProbabilities,
    odds: &OddsTriple,
    outcome: Outcome,
) -> Result<ValueRating, PredictionError> {
    OddsConverter::validate(odds)?;

    let confidence = probabilities.max_probability();
    let model_probability = probabilities.get(outcome);
    let implied_probability = 1.0 / odds.get(outcome);
    let value = (model_probability - implied_probability) * VALUE_SCALE;
    let advice = classify_advice(value, confidence);

    Ok(ValueRating {
        outcome,
        model_probability,
        implied_probability,
        value,
        rating: value.clamp(0.0, VALUE_SCALE),
        advice,
        advice_text: advice_text(advice, outcome, confidence),
    })
}

/// Full value assessment. Absent odds give the "no odds available" result rather than an error.
pub fn rate_value(
    probabilities: &OutcomeProbabilities,
    odds: Option<&OddsTriple>,
) -> Result<ValueAssessment, PredictionError> {
    let Some(odds) = odds else {
        return Ok(ValueAssessment {
            ratios: None,
            overall: None,
            insight: NO_ODDS_INSIGHT.to_string(),
        });
    };

    let overall = rate_outcome(probabilities, odds, probabilities.argmax())?;
    Ok(ValueAssessment {
        ratios: Some(outcome_ratios(probabilities, odds)),
        overall: Some(overall),
        insight: betting_insight(probabilities, Some(odds)),
    })
}

fn capitalized(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::HomeWin => "Home win",
        Outcome::Draw => "Draw",
        Outcome::AwayWin => "Away win",
    }
}
