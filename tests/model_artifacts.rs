use matchcast::application::ml::{ForestPredictor, OutcomeProbabilityModel, PredictionMethod};
use matchcast::config::ModelEnvConfig;
use matchcast::domain::accuracy::classify_result;
use matchcast::domain::ml::{FeatureVector, extract_features};
use matchcast::domain::types::{Outcome, TeamStats};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
use std::path::PathBuf;

fn side(level: u32) -> TeamStats {
    TeamStats::from_results(level * 2, 4, 14 - level * 2, 10 + level * 4, 30 - level * 2)
}

/// Synthetic league: the side two or more levels stronger wins, otherwise a draw.
fn history() -> Vec<(FeatureVector, Outcome)> {
    let mut samples = Vec::new();
    for h in 0..8 {
        for a in 0..8 {
            let (home_goals, away_goals) = if h >= a + 2 {
                (2, 0)
            } else if a >= h + 2 {
                (0, 2)
            } else {
                (1, 1)
            };
            samples.push((
                extract_features(&side(h), &side(a)),
                classify_result(home_goals, away_goals),
            ));
        }
    }
    samples
}

fn write_model(tag: &str, name: &str, n_trees: usize) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "matchcast-artifact-{}-{}.json",
        tag,
        std::process::id()
    ));
    let params = RandomForestRegressorParameters::default().with_n_trees(n_trees);
    ForestPredictor::train(name, "2025.1", &history(), params)
        .unwrap()
        .save(&path)
        .unwrap();
    path
}

fn cleanup(paths: &[PathBuf]) {
    for path in paths {
        std::fs::remove_file(path).ok();
    }
}

#[test]
fn test_two_artifacts_are_ensembled() {
    let primary = write_model("ens-a", "forest-a", 15);
    let secondary = write_model("ens-b", "forest-b", 25);
    let model = OutcomeProbabilityModel::from_config(&ModelEnvConfig {
        primary_model_path: Some(primary.clone()),
        secondary_model_path: Some(secondary.clone()),
        use_ensemble: true,
    });
    assert_eq!(model.loaded_models(), vec!["forest-a", "forest-b"]);

    let ensembled = model.predict(&side(7), &side(0), true);
    assert!((ensembled.probabilities.sum() - 1.0).abs() < 1e-9);
    assert_eq!(ensembled.probabilities.argmax(), Outcome::HomeWin);
    assert_eq!(ensembled.method.name(), "ensemble");
    assert_eq!(ensembled.method.version(), "forest-a+forest-b");
    assert_eq!(ensembled.summary.method, "ensemble");

    let single = model.predict(&side(7), &side(0), false);
    assert_eq!(
        single.method,
        PredictionMethod::Model {
            name: "forest-a".to_string(),
            version: "2025.1".to_string()
        }
    );

    cleanup(&[primary, secondary]);
}

#[test]
fn test_single_artifact_ignores_ensemble_flag() {
    let primary = write_model("single", "forest-only", 15);
    let model = OutcomeProbabilityModel::from_config(&ModelEnvConfig {
        primary_model_path: Some(primary.clone()),
        secondary_model_path: None,
        use_ensemble: true,
    });

    let prediction = model.predict(&side(0), &side(7), true);
    assert_eq!(prediction.method.name(), "forest-only");
    assert!(prediction.probabilities.is_normalized(1e-9));
    assert_eq!(prediction.probabilities.argmax(), Outcome::AwayWin);

    cleanup(&[primary]);
}

#[test]
fn test_malformed_artifact_leaves_slot_empty() {
    let path = std::env::temp_dir().join(format!(
        "matchcast-artifact-broken-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{"name": "bad", "version": "0", "home": [1.0]}"#).unwrap();

    let model = OutcomeProbabilityModel::from_config(&ModelEnvConfig {
        primary_model_path: Some(path.clone()),
        secondary_model_path: Some(PathBuf::from("/nonexistent/matchcast/model.json")),
        use_ensemble: true,
    });
    assert!(!model.has_trained_model());
    assert_eq!(model.predict(&side(3), &side(3), true).method.name(), "heuristic");

    cleanup(&[path]);
}
