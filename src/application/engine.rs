//! `PredictionEngine`: the operation set exposed to the HTTP and persistence layers,
//! plus the two end-to-end pipelines (team statistics, market odds).

use super::confidence;
use super::ml::{OutcomePrediction, OutcomeProbabilityModel};
use super::narrative::NarrativeGenerator;
use super::odds::OddsConverter;
use super::score_predictor;
use super::value_bet;
use crate::config::EngineConfig;
use crate::domain::errors::PredictionError;
use crate::domain::ml::{FeatureVector, extract_features};
use crate::domain::types::{
    ConfidenceAssessment, DataQuality, FeatureSummary, MatchRequest, Narrative, OddsTriple,
    OutcomeProbabilities, PredictionResult, ScoreLine, TeamStats, ValueAssessment,
};
use crate::infrastructure::llm::OpenAiCompatibleProvider;
use std::sync::Arc;
use tracing::{debug, info};

pub const MARKET_ODDS_METHOD: &str = "market-odds";
pub const MARKET_ODDS_VERSION: &str = "devig-1";

/// Per-request switches for the full pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictOptions {
    pub use_ensemble: bool,
    pub with_narrative: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            use_ensemble: true,
            with_narrative: true,
        }
    }
}

pub struct PredictionEngine {
    model: OutcomeProbabilityModel,
    narrator: NarrativeGenerator,
    use_ensemble: bool,
}

impl PredictionEngine {
    pub fn new(model: OutcomeProbabilityModel, narrator: NarrativeGenerator) -> Self {
        Self {
            model,
            narrator,
            use_ensemble: true,
        }
    }

    /// Heuristic model and rule-based narrative. No I/O.
    pub fn offline() -> Self {
        Self::new(OutcomeProbabilityModel::new(), NarrativeGenerator::rule_based())
    }

    /// Loads model artifacts and wires the narrative provider when a key is configured.
    pub fn from_config(config: &EngineConfig) -> Self {
        let model = OutcomeProbabilityModel::from_config(&config.model);
        let narrator = match OpenAiCompatibleProvider::from_config(&config.narrative) {
            Some(provider) => {
                NarrativeGenerator::with_provider(Arc::new(provider), config.narrative.timeout())
            }
            None => {
                info!("No narrative provider configured, using rule-based narratives");
                NarrativeGenerator::rule_based()
            }
        };

        info!(
            "Prediction engine ready: {} trained model(s) {:?}, ensemble default {}",
            model.loaded_models().len(),
            model.loaded_models(),
            config.model.use_ensemble
        );

        Self {
            model,
            narrator,
            use_ensemble: config.model.use_ensemble,
        }
    }

    /// Ensembling flag applied when callers rely on the configured default.
    pub fn default_options(&self) -> PredictOptions {
        PredictOptions {
            use_ensemble: self.use_ensemble,
            with_narrative: true,
        }
    }

    pub fn model(&self) -> &OutcomeProbabilityModel {
        &self.model
    }

    pub fn extract_features(&self, home: &TeamStats, away: &TeamStats) -> FeatureVector {
        extract_features(home, away)
    }

    pub fn predict_outcome(
        &self,
        home: &TeamStats,
        away: &TeamStats,
        use_ensemble: bool,
    ) -> OutcomePrediction {
        self.model.predict(home, away, use_ensemble)
    }

    pub fn predict_outcome_from_odds(
        &self,
        odds: &OddsTriple,
    ) -> Result<OutcomeProbabilities, PredictionError> {
        OddsConverter::to_probabilities(odds)
    }

    pub fn predict_score(&self, home: &TeamStats, away: &TeamStats) -> ScoreLine {
        score_predictor::predict_score(home, away)
    }

    pub fn score_confidence(
        &self,
        probabilities: &OutcomeProbabilities,
        quality: DataQuality,
    ) -> ConfidenceAssessment {
        confidence::score_confidence(probabilities, quality)
    }

    pub fn rate_value(
        &self,
        probabilities: &OutcomeProbabilities,
        odds: Option<&OddsTriple>,
    ) -> Result<ValueAssessment, PredictionError> {
        value_bet::rate_value(probabilities, odds)
    }

    pub async fn generate_narrative(
        &self,
        home_name: &str,
        away_name: &str,
        home: &TeamStats,
        away: &TeamStats,
        probabilities: &OutcomeProbabilities,
    ) -> Narrative {
        self.narrator
            .analyze(home_name, away_name, home, away, probabilities)
            .await
    }

    /// Full pipeline from team statistics. Odds, when listed, are validated before
    /// any other work so a bad price fails fast.
    pub async fn predict_match(
        &self,
        request: &MatchRequest,
        options: PredictOptions,
    ) -> Result<PredictionResult, PredictionError> {
        if let Some(odds) = &request.odds {
            OddsConverter::validate(odds)?;
        }

        let home = &request.home_stats;
        let away = &request.away_stats;

        let prediction = self.model.predict(home, away, options.use_ensemble);
        let probabilities = prediction.probabilities;
        let quality = DataQuality::from_stats(home, away);
        let confidence = confidence::score_confidence(&probabilities, quality);
        let value = value_bet::rate_value(&probabilities, request.odds.as_ref())?;

        let narrative = if options.with_narrative {
            Some(
                self.narrator
                    .analyze(&request.home_name, &request.away_name, home, away, &probabilities)
                    .await,
            )
        } else {
            None
        };

        debug!(
            "{} vs {}: {:?} via {}",
            request.home_name,
            request.away_name,
            probabilities,
            prediction.method.name()
        );

        Ok(PredictionResult {
            home_team: request.home_name.clone(),
            away_team: request.away_name.clone(),
            probabilities,
            predicted: probabilities.argmax(),
            confidence,
            score: Some(score_predictor::predict_score(home, away)),
            feature_summary: prediction.summary,
            value,
            narrative,
            model_name: prediction.method.name().to_string(),
            model_version: prediction.method.version(),
        })
    }

    /// Market-informed pipeline: probabilities come from de-vigged odds alone.
    ///
    /// Without team statistics there is no score line and no narrative, and the
    /// AI score carries the missing-data penalty.
    pub async fn predict_from_market(
        &self,
        home_name: &str,
        away_name: &str,
        odds: &OddsTriple,
        stats: Option<(TeamStats, TeamStats)>,
        with_narrative: bool,
    ) -> Result<PredictionResult, PredictionError> {
        let probabilities = OddsConverter::to_probabilities(odds)?;

        let quality = match &stats {
            Some((home, away)) => DataQuality::from_stats(home, away),
            None => DataQuality::Missing,
        };
        let confidence = confidence::score_confidence(&probabilities, quality);
        let value = value_bet::rate_value(&probabilities, Some(odds))?;

        let mut summary = FeatureSummary {
            method: MARKET_ODDS_METHOD.to_string(),
            ..Default::default()
        };
        summary
            .values
            .insert("overround".to_string(), OddsConverter::overround(odds)?);

        let narrative = match (&stats, with_narrative) {
            (Some((home, away)), true) => Some(
                self.narrator
                    .analyze(home_name, away_name, home, away, &probabilities)
                    .await,
            ),
            _ => None,
        };

        Ok(PredictionResult {
            home_team: home_name.to_string(),
            away_team: away_name.to_string(),
            probabilities,
            predicted: probabilities.argmax(),
            confidence,
            score: stats
                .as_ref()
                .map(|(home, away)| score_predictor::predict_score(home, away)),
            feature_summary: summary,
            value,
            narrative,
            model_name: MARKET_ODDS_METHOD.to_string(),
            model_version: MARKET_ODDS_VERSION.to_string(),
        })
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::OutcomePredictor;
    use crate::domain::errors::ModelError;
    use crate::domain::types::{ConfidenceLabel, Outcome};

    struct FixedPredictor(OutcomeProbabilities);

    impl OutcomePredictor for FixedPredictor {
        fn predict(&self, _features: &FeatureVector) -> Result<OutcomeProbabilities, ModelError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn version(&self) -> &str {
            "1"
        }
    }

    fn request(odds: Option<OddsTriple>) -> MatchRequest {
        MatchRequest {
            home_name: "Home FC".to_string(),
            away_name: "Away FC".to_string(),
            home_stats: TeamStats::from_results(15, 3, 2, 48, 18),
            away_stats: TeamStats::from_results(10, 5, 5, 35, 25),
            odds,
        }
    }

    #[tokio::test]
    async fn test_predict_match_heuristic_pipeline() {
        let engine = PredictionEngine::offline();
        let result = engine
            .predict_match(
                &request(Some(OddsTriple::new(1.8, 3.6, 4.5))),
                PredictOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(result.model_name, "heuristic");
        assert_eq!(result.predicted, Outcome::HomeWin);
        assert!(result.probabilities.is_normalized(1e-9));
        assert_eq!(result.confidence.quality, DataQuality::Complete);
        assert!(result.score.is_some());
        assert!(result.value.overall.is_some());
        assert!(result.narrative.unwrap().is_fallback());
        assert!(result.feature_summary.get("strength_difference").is_some());
    }

    #[tokio::test]
    async fn test_predict_match_rejects_bad_odds_first() {
        let engine = PredictionEngine::offline();
        let err = engine
            .predict_match(
                &request(Some(OddsTriple::new(2.0, 0.0, 3.0))),
                PredictOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PredictionError::InvalidOdds {
                outcome: Outcome::Draw,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_predict_match_without_odds_or_narrative() {
        let engine = PredictionEngine::offline();
        let options = PredictOptions {
            use_ensemble: false,
            with_narrative: false,
        };
        let result = engine.predict_match(&request(None), options).await.unwrap();
        assert!(result.narrative.is_none());
        assert!(result.value.overall.is_none());
        assert_eq!(result.value.insight, value_bet::NO_ODDS_INSIGHT);
    }

    #[tokio::test]
    async fn test_predict_match_uses_trained_model() {
        let model = OutcomeProbabilityModel::with_predictors(vec![Arc::new(FixedPredictor(
            OutcomeProbabilities::new(0.2, 0.3, 0.5),
        ))]);
        let engine = PredictionEngine::new(model, NarrativeGenerator::rule_based());
        let result = engine
            .predict_match(&request(None), PredictOptions::default())
            .await
            .unwrap();

        assert_eq!(result.model_name, "fixed");
        assert_eq!(result.model_version, "1");
        assert_eq!(result.predicted, Outcome::AwayWin);
    }

    #[tokio::test]
    async fn test_market_pipeline_without_stats() {
        let engine = PredictionEngine::offline();
        let result = engine
            .predict_from_market("A", "B", &OddsTriple::new(1.5, 4.2, 6.5), None, true)
            .await
            .unwrap();

        assert_eq!(result.model_name, MARKET_ODDS_METHOD);
        assert_eq!(result.predicted, Outcome::HomeWin);
        assert!((result.probabilities.sum() - 1.0).abs() < 1e-9);
        assert_eq!(result.confidence.raw, result.probabilities.max_probability());
        assert_eq!(result.confidence.label, ConfidenceLabel::High);
        assert_eq!(result.confidence.quality, DataQuality::Missing);
        assert!((result.confidence.ai_score - result.confidence.raw * 7.0).abs() < 1e-9);
        assert!(result.score.is_none());
        assert!(result.narrative.is_none());
        assert!(result.feature_summary.get("overround").unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_market_pipeline_with_stats() {
        let engine = PredictionEngine::offline();
        let req = request(None);
        let result = engine
            .predict_from_market(
                "A",
                "B",
                &OddsTriple::new(2.5, 3.2, 2.8),
                Some((req.home_stats, req.away_stats)),
                true,
            )
            .await
            .unwrap();

        assert_eq!(result.confidence.quality, DataQuality::Complete);
        assert!(result.score.is_some());
        assert!(result.narrative.is_some());
    }

    #[tokio::test]
    async fn test_market_pipeline_rejects_negative_odds() {
        let engine = PredictionEngine::offline();
        let result = engine
            .predict_from_market("A", "B", &OddsTriple::new(-2.0, 3.0, 3.0), None, false)
            .await;
        assert!(result.is_err());
    }
}
