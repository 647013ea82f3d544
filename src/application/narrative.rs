//! Match narrative: delegated to an external provider when one is configured, otherwise
//! (or on any provider failure) built from a fixed rule-based template.

use super::confidence::confidence_label;
use crate::domain::errors::NarrativeProviderError;
use crate::domain::narrative::NarrativeProvider;
use crate::domain::types::{
    ConfidenceLabel, Narrative, OutcomeProbabilities, RULE_BASED_SOURCE, TeamStats,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Points-per-game gap that counts as a clear difference in form.
pub const FORM_GAP_PPG: f64 = 0.5;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

pub struct NarrativeGenerator {
    provider: Option<Arc<dyn NarrativeProvider>>,
    timeout: Duration,
}

impl NarrativeGenerator {
    pub fn rule_based() -> Self {
        Self {
            provider: None,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_provider(provider: Arc<dyn NarrativeProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Never fails: provider errors and timeouts are logged and replaced by the fallback.
    pub async fn analyze(
        &self,
        home_name: &str,
        away_name: &str,
        home: &TeamStats,
        away: &TeamStats,
        probabilities: &OutcomeProbabilities,
    ) -> Narrative {
        if let Some(provider) = &self.provider {
            let prompt = build_prompt(home_name, away_name, home, away, probabilities);
            match self.call_provider(provider.as_ref(), &prompt).await {
                Ok(text) => {
                    debug!("Narrative for {} vs {} from {}", home_name, away_name, provider.name());
                    return Narrative {
                        text,
                        source: provider.name().to_string(),
                    };
                }
                Err(e) => warn!(
                    "Narrative provider {} failed for {} vs {}, using rule-based fallback: {}",
                    provider.name(),
                    home_name,
                    away_name,
                    e
                ),
            }
        }

        Narrative {
            text: fallback_narrative(home_name, away_name, home, away, probabilities),
            source: RULE_BASED_SOURCE.to_string(),
        }
    }

    async fn call_provider(
        &self,
        provider: &dyn NarrativeProvider,
        prompt: &str,
    ) -> Result<String, NarrativeProviderError> {
        let text = tokio::time::timeout(self.timeout, provider.complete(prompt))
            .await
            .map_err(|_| NarrativeProviderError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            })??;

        let text = text.trim();
        if text.is_empty() {
            return Err(NarrativeProviderError::EmptyCompletion);
        }
        Ok(text.to_string())
    }
}

impl Default for NarrativeGenerator {
    fn default() -> Self {
        Self::rule_based()
    }
}

pub fn build_prompt(
    home_name: &str,
    away_name: &str,
    home: &TeamStats,
    away: &TeamStats,
    probabilities: &OutcomeProbabilities,
) -> String {
    format!(
        "Analyze this football match prediction:

Match: {home_name} (Home) vs {away_name} (Away)

Home Team Statistics:
{home_block}
Away Team Statistics:
{away_block}
AI Prediction:
- Home Win Probability: {home_pct:.1}%
- Draw Probability: {draw_pct:.1}%
- Away Win Probability: {away_pct:.1}%

Provide a brief analysis (3-4 sentences) covering:
1. Key factors influencing the prediction
2. Notable strengths/weaknesses of each team
3. Potential outcome and confidence level
",
        home_block = stats_block(home),
        away_block = stats_block(away),
        home_pct = probabilities.home * 100.0,
        draw_pct = probabilities.draw * 100.0,
        away_pct = probabilities.away * 100.0,
    )
}

fn stats_block(stats: &TeamStats) -> String {
    format!(
        "- Win Rate: {:.1}%
- Goals For: {} ({:.2} per game)
- Goals Against: {} ({:.2} per game)
- Points: {} ({:.2} per game)
",
        stats.win_rate() * 100.0,
        stats.goals_for,
        stats.goals_for_per_game(),
        stats.goals_against,
        stats.goals_against_per_game(),
        stats.points,
        stats.points_per_game(),
    )
}

/// Deterministic three-sentence analysis. Identical inputs give identical text.
pub fn fallback_narrative(
    home_name: &str,
    away_name: &str,
    home: &TeamStats,
    away: &TeamStats,
    probabilities: &OutcomeProbabilities,
) -> String {
    let home_ppg = home.points_per_game();
    let away_ppg = away.points_per_game();
    let OutcomeProbabilities {
        home: home_p,
        draw: draw_p,
        away: away_p,
    } = *probabilities;

    // A tie for the top spot reads as a draw.
    let (prediction, confidence) = if home_p > draw_p && home_p > away_p {
        (format!("{} win", home_name), confidence_label(home_p))
    } else if away_p > draw_p && away_p > home_p {
        (format!("{} win", away_name), confidence_label(away_p))
    } else {
        ("Draw".to_string(), ConfidenceLabel::Moderate)
    };

    let form = if home_ppg > away_ppg + FORM_GAP_PPG {
        format!("{} showing significantly better form", home_name)
    } else if away_ppg > home_ppg + FORM_GAP_PPG {
        format!("{} showing significantly better form", away_name)
    } else {
        "Both teams in similar form".to_string()
    };

    // Sentences end with ". " before each line break.
    format!(
        "Analysis: {form} with {home_name} averaging {home_ppg:.2} points per game \
         compared to {away_name}'s {away_ppg:.2}. \n\
         The prediction favors a {prediction} with {confidence} confidence \
         ({top:.1}% probability). \n\
         Home advantage and current statistics support this outcome.",
        top = probabilities.max_probability() * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl NarrativeProvider for EchoProvider {
        async fn complete(&self, prompt: &str) -> Result<String, NarrativeProviderError> {
            Ok(format!("  echo: {}  ", prompt.lines().nth(2).unwrap_or_default()))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl NarrativeProvider for FailingProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, NarrativeProviderError> {
            Err(NarrativeProviderError::BadStatus {
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl NarrativeProvider for SlowProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, NarrativeProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct BlankProvider;

    #[async_trait]
    impl NarrativeProvider for BlankProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, NarrativeProviderError> {
            Ok("   ".to_string())
        }

        fn name(&self) -> &str {
            "blank"
        }
    }

    fn stats(points: u32, games: u32) -> TeamStats {
        TeamStats {
            points,
            games_played: games,
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_home_favoured() {
        let text = fallback_narrative(
            "Arsenal",
            "Burnley",
            &stats(48, 20),
            &stats(20, 20),
            &OutcomeProbabilities::new(0.6, 0.2, 0.2),
        );
        assert_eq!(
            text,
            "Analysis: Arsenal showing significantly better form with Arsenal averaging 2.40 \
             points per game compared to Burnley's 1.00. \n\
             The prediction favors a Arsenal win with high confidence (60.0% probability). \n\
             Home advantage and current statistics support this outcome."
        );
    }

    #[test]
    fn test_fallback_away_form_and_moderate_confidence() {
        let text = fallback_narrative(
            "A",
            "B",
            &stats(10, 20),
            &stats(40, 20),
            &OutcomeProbabilities::new(0.3, 0.25, 0.45),
        );
        assert!(text.starts_with("Analysis: B showing significantly better form"));
        assert!(text.contains("favors a B win with moderate confidence (45.0% probability)"));
    }

    #[test]
    fn test_fallback_similar_form_and_draw() {
        let text = fallback_narrative(
            "A",
            "B",
            &stats(30, 20),
            &stats(30, 20),
            &OutcomeProbabilities::new(0.35, 0.35, 0.3),
        );
        assert!(text.starts_with("Analysis: Both teams in similar form"));
        assert!(!text.contains("significantly better"));
        assert!(text.contains("favors a Draw with moderate confidence (35.0% probability)"));
    }

    #[test]
    fn test_fallback_keeps_sentence_spacing() {
        let text = fallback_narrative(
            "A",
            "B",
            &stats(30, 20),
            &stats(30, 20),
            &OutcomeProbabilities::new(0.5, 0.3, 0.2),
        );
        let expected = [
            "Analysis: Both teams in similar form with A averaging 1.50 points per game \
             compared to B's 1.50. ",
            "The prediction favors a A win with moderate confidence (50.0% probability). ",
            "Home advantage and current statistics support this outcome.",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_prompt_contains_normalized_stats() {
        let home = TeamStats::from_results(15, 3, 2, 48, 18);
        let away = TeamStats::from_results(10, 5, 5, 35, 25);
        let prompt = build_prompt(
            "Home FC",
            "Away FC",
            &home,
            &away,
            &OutcomeProbabilities::new(0.5, 0.3, 0.2),
        );

        assert!(prompt.contains("Match: Home FC (Home) vs Away FC (Away)"));
        assert!(prompt.contains("- Win Rate: 75.0%"));
        assert!(prompt.contains("- Goals For: 48 (2.40 per game)"));
        assert!(prompt.contains("- Goals Against: 25 (1.25 per game)"));
        assert!(prompt.contains("- Points: 35 (1.75 per game)"));
        assert!(prompt.contains("- Home Win Probability: 50.0%"));
        assert!(prompt.contains("- Away Win Probability: 20.0%"));
    }

    #[tokio::test]
    async fn test_provider_text_is_used_and_trimmed() {
        let generator =
            NarrativeGenerator::with_provider(Arc::new(EchoProvider), Duration::from_secs(1));
        let narrative = generator
            .analyze("A", "B", &stats(1, 1), &stats(1, 1), &OutcomeProbabilities::uniform())
            .await;
        assert_eq!(narrative.source, "echo");
        assert_eq!(narrative.text, "echo: Match: A (Home) vs B (Away)");
        assert!(!narrative.is_fallback());
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let generator =
            NarrativeGenerator::with_provider(Arc::new(FailingProvider), Duration::from_secs(1));
        let probs = OutcomeProbabilities::new(0.5, 0.3, 0.2);
        let narrative = generator
            .analyze("A", "B", &stats(30, 20), &stats(30, 20), &probs)
            .await;
        assert!(narrative.is_fallback());
        assert_eq!(
            narrative.text,
            fallback_narrative("A", "B", &stats(30, 20), &stats(30, 20), &probs)
        );
    }

    #[tokio::test]
    async fn test_provider_timeout_falls_back() {
        let generator =
            NarrativeGenerator::with_provider(Arc::new(SlowProvider), Duration::from_millis(50));
        let narrative = generator
            .analyze("A", "B", &stats(30, 20), &stats(30, 20), &OutcomeProbabilities::uniform())
            .await;
        assert!(narrative.is_fallback());
    }

    #[tokio::test]
    async fn test_blank_completion_falls_back() {
        let generator =
            NarrativeGenerator::with_provider(Arc::new(BlankProvider), Duration::from_secs(1));
        let narrative = generator
            .analyze("A", "B", &stats(30, 20), &stats(30, 20), &OutcomeProbabilities::uniform())
            .await;
        assert!(narrative.is_fallback());
    }

    #[tokio::test]
    async fn test_rule_based_generator() {
        let generator = NarrativeGenerator::default();
        assert!(!generator.has_provider());
        let narrative = generator
            .analyze("A", "B", &stats(30, 20), &stats(30, 20), &OutcomeProbabilities::uniform())
            .await;
        assert_eq!(narrative.source, RULE_BASED_SOURCE);
    }
}
