use anyhow::Context;
use clap::{Parser, Subcommand};
use matchcast::application::ml::ForestPredictor;
use matchcast::application::{PredictOptions, PredictionEngine};
use matchcast::config::EngineConfig;
use matchcast::domain::accuracy::{AccuracyStats, GradedPrediction, classify_result, grade};
use matchcast::domain::ml::extract_features;
use matchcast::domain::types::{MatchRequest, OddsTriple, Outcome, TeamStats};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a fixture from team statistics (and optional odds)
    Predict {
        /// JSON file: {home_name, away_name, home_stats, away_stats, odds?}
        #[arg(short, long)]
        input: PathBuf,

        /// Use only the first trained model that answers instead of averaging all loaded models
        #[arg(long)]
        no_ensemble: bool,

        /// Skip narrative generation
        #[arg(long)]
        no_narrative: bool,
    },
    /// Predict a fixture from bookmaker odds alone
    Market {
        #[arg(long)]
        home_odds: f64,
        #[arg(long)]
        draw_odds: f64,
        #[arg(long)]
        away_odds: f64,
        #[arg(long, default_value = "Home")]
        home: String,
        #[arg(long, default_value = "Away")]
        away: String,

        /// Optional JSON file {home_stats, away_stats}; enables score line and narrative
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Skip narrative generation (only produced when --stats is given)
        #[arg(long)]
        no_narrative: bool,
    },
    /// Grade past predictions against final scores
    Grade {
        /// JSON array of {predicted, home_goals, away_goals}
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Train an outcome model from finished matches and save it as an artifact
    Train {
        /// JSON array of {home_stats, away_stats, home_goals, away_goals}
        #[arg(short, long)]
        input: PathBuf,

        /// Artifact path (use as PRIMARY_MODEL_PATH or SECONDARY_MODEL_PATH)
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value = "forest")]
        name: String,

        #[arg(long, default_value = "v1")]
        model_version: String,

        #[arg(long, default_value = "100")]
        n_trees: usize,

        #[arg(long, default_value = "8")]
        max_depth: u16,
    },
}

#[derive(Debug, Deserialize)]
struct FinishedMatch {
    predicted: Outcome,
    home_goals: u32,
    away_goals: u32,
}

#[derive(Debug, Serialize)]
struct GradeReport {
    graded: Vec<GradedPrediction>,
    stats: AccuracyStats,
}

#[derive(Debug, Deserialize)]
struct MarketStats {
    home_stats: TeamStats,
    away_stats: TeamStats,
}

#[derive(Debug, Deserialize)]
struct TrainingMatch {
    #[serde(default)]
    home_stats: TeamStats,
    #[serde(default)]
    away_stats: TeamStats,
    home_goals: u32,
    away_goals: u32,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

/// `--no-ensemble` can only turn ensembling off; the configured default decides otherwise.
fn predict_options(
    default_ensemble: bool,
    no_ensemble: bool,
    no_narrative: bool,
) -> PredictOptions {
    PredictOptions {
        use_ensemble: default_ensemble && !no_ensemble,
        with_narrative: !no_narrative,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays pure JSON
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            input,
            no_ensemble,
            no_narrative,
        } => {
            let config = EngineConfig::from_env()?;
            let engine = PredictionEngine::from_config(&config);
            let request: MatchRequest = read_json(&input)?;

            let options = predict_options(
                engine.default_options().use_ensemble,
                no_ensemble,
                no_narrative,
            );
            info!("Predicting {} vs {}", request.home_name, request.away_name);
            let result = engine.predict_match(&request, options).await?;
            print_json(&result)?;
        }
        Commands::Market {
            home_odds,
            draw_odds,
            away_odds,
            home,
            away,
            stats,
            no_narrative,
        } => {
            let config = EngineConfig::from_env()?;
            let engine = PredictionEngine::from_config(&config);
            let odds = OddsTriple::new(home_odds, draw_odds, away_odds);
            let stats = match stats {
                Some(path) => {
                    let s: MarketStats = read_json(&path)?;
                    Some((s.home_stats, s.away_stats))
                }
                None => None,
            };

            let result = engine
                .predict_from_market(&home, &away, &odds, stats, !no_narrative)
                .await?;
            print_json(&result)?;
        }
        Commands::Grade { input } => {
            let matches: Vec<FinishedMatch> = read_json(&input)?;
            let graded: Vec<GradedPrediction> = matches
                .iter()
                .map(|m| grade(m.predicted, m.home_goals, m.away_goals))
                .collect();
            let stats = AccuracyStats::from_graded(&graded);
            info!(
                "Graded {} predictions: {}% correct",
                stats.total, stats.accuracy_pct
            );
            print_json(&GradeReport { graded, stats })?;
        }
        Commands::Train {
            input,
            output,
            name,
            model_version,
            n_trees,
            max_depth,
        } => {
            let matches: Vec<TrainingMatch> = read_json(&input)?;
            let samples: Vec<_> = matches
                .iter()
                .map(|m| {
                    (
                        extract_features(&m.home_stats, &m.away_stats),
                        classify_result(m.home_goals, m.away_goals),
                    )
                })
                .collect();

            let params = RandomForestRegressorParameters::default()
                .with_n_trees(n_trees)
                .with_max_depth(max_depth);
            let model = ForestPredictor::train(&name, &model_version, &samples, params)
                .context("Failed to train outcome model")?;
            model.save(&output).context("Failed to save outcome model")?;
            info!("Model {} saved to {:?}", name, output);
        }
    }

    Ok(())
}
