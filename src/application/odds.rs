//! Decimal odds to market-implied probabilities.

use crate::domain::errors::PredictionError;
use crate::domain::types::{OddsTriple, Outcome, OutcomeProbabilities};

pub struct OddsConverter;

impl OddsConverter {
    /// Rejects any non-positive or non-finite price, and any price so small its
    /// implied probability overflows.
    pub fn validate(odds: &OddsTriple) -> Result<(), PredictionError> {
        for outcome in Outcome::ALL {
            let price = odds.get(outcome);
            if !price.is_finite() || price <= 0.0 || !(1.0 / price).is_finite() {
                return Err(PredictionError::InvalidOdds {
                    outcome,
                    odds: price,
                });
            }
        }
        Ok(())
    }

    /// Raw `1/odds` for each outcome. Still contains the bookmaker margin.
    pub fn implied_probabilities(
        odds: &OddsTriple,
    ) -> Result<OutcomeProbabilities, PredictionError> {
        Self::validate(odds)?;
        Ok(OutcomeProbabilities::new(
            1.0 / odds.home,
            1.0 / odds.draw,
            1.0 / odds.away,
        ))
    }

    /// Implied probabilities rescaled to sum to exactly 1 (margin removed).
    ///
    /// Works on `shortest / odds` rather than `1 / odds`: each term lies in `(0, 1]`, so the
    /// total stays finite even for extreme prices.
    pub fn to_probabilities(odds: &OddsTriple) -> Result<OutcomeProbabilities, PredictionError> {
        Self::validate(odds)?;
        let shortest = odds.home.min(odds.draw).min(odds.away);
        let home = shortest / odds.home;
        let draw = shortest / odds.draw;
        let away = shortest / odds.away;
        let total = home + draw + away;
        Ok(OutcomeProbabilities::new(home / total, draw / total, away / total))
    }

    /// Bookmaker margin: how far the raw implied probabilities exceed 1.
    pub fn overround(odds: &OddsTriple) -> Result<f64, PredictionError> {
        Ok(Self::implied_probabilities(odds)?.sum() - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devig_reference_market() {
        let probs = OddsConverter::to_probabilities(&OddsTriple::new(2.5, 3.2, 2.8)).unwrap();
        assert!((probs.sum() - 1.0).abs() < 1e-9);
        // raw 0.4 / 0.3125 / 0.357..., total 1.0696...
        let total = 0.4 + 0.3125 + 1.0 / 2.8;
        assert!((probs.home - 0.4 / total).abs() < 1e-9);
        assert!((probs.draw - 0.3125 / total).abs() < 1e-9);
        assert!(probs.home > probs.away && probs.away > probs.draw);
    }

    #[test]
    fn test_overround() {
        let margin = OddsConverter::overround(&OddsTriple::new(2.0, 4.0, 4.0)).unwrap();
        assert!(margin.abs() < 1e-12);

        let margin = OddsConverter::overround(&OddsTriple::new(1.9, 3.4, 3.9)).unwrap();
        assert!(margin > 0.0);
    }

    #[test]
    fn test_rejects_non_positive_odds() {
        let err = OddsConverter::to_probabilities(&OddsTriple::new(2.0, 0.0, 3.0)).unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidOdds {
                outcome: Outcome::Draw,
                odds: 0.0
            }
        );

        assert!(OddsConverter::to_probabilities(&OddsTriple::new(-1.5, 3.0, 3.0)).is_err());
        assert!(OddsConverter::to_probabilities(&OddsTriple::new(2.0, 3.0, f64::NAN)).is_err());
        assert!(
            OddsConverter::to_probabilities(&OddsTriple::new(2.0, f64::INFINITY, 3.0)).is_err()
        );
    }

    #[test]
    fn test_rejects_price_with_overflowing_reciprocal() {
        let err = OddsConverter::to_probabilities(&OddsTriple::new(1e-309, 3.0, 3.0)).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::InvalidOdds {
                outcome: Outcome::HomeWin,
                ..
            }
        ));
    }

    #[test]
    fn test_extreme_prices_still_normalize() {
        let probs =
            OddsConverter::to_probabilities(&OddsTriple::new(1e-308, 1e-308, 1e-308)).unwrap();
        assert!(probs.is_normalized(1e-12));
        assert!((probs.home - 1.0 / 3.0).abs() < 1e-12);

        let probs = OddsConverter::to_probabilities(&OddsTriple::new(1.0, 1e300, 1e300)).unwrap();
        assert!(probs.is_normalized(1e-12));
        assert!(probs.home > 0.999);
    }
}
