//! Test-phase CLI: dump decoded test sketches, then score the test set against a train set.

use anyhow::Result;
use clap::Parser;
use sketchret::dataset::{SketchDataset, SketchSet};
use sketchret::model::load_autoencoder;
use sketchret::{Config, TestHarness, TestMode};
use std::path::PathBuf;

const DEFAULT_WEIGHTS: &str = "model.json";

/// Evaluate a pretrained sketch autoencoder by rank-based retrieval accuracy.
#[derive(Parser, Debug)]
#[command(name = "sketchret", version)]
struct Args {
    /// Checkpoint holding encoder and decoder weights.
    #[arg(long)]
    weights: Option<PathBuf>,

    /// 0: test vs full train, 1: test vs limited train, 2: test vs full train.
    #[arg(long = "test_mode", alias = "test-mode", value_parser = clap::value_parser!(i64).range(0..=2))]
    test_mode: i64,

    /// Dataset (common) config; defaults to $SKETCHRET_DATASET_CONFIG or dataset.json.
    #[arg(long)]
    dataset_config: Option<PathBuf>,

    /// Test config; defaults to $SKETCHRET_TEST_CONFIG or test.json.
    #[arg(long)]
    test_config: Option<PathBuf>,

    /// Do not write score table CSVs or the JSON report.
    #[arg(long)]
    no_dump: bool,

    /// Do not write decoded test sketches.
    #[arg(long)]
    skip_decoded: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let mode = TestMode::try_from(args.test_mode)?;

    let weights = args.weights.unwrap_or_else(|| {
        log::info!("No weights specified, using default: {}", DEFAULT_WEIGHTS);
        PathBuf::from(DEFAULT_WEIGHTS)
    });

    let mut config = match (&args.dataset_config, &args.test_config) {
        (Some(dataset), Some(test)) => Config::load(dataset, test)?,
        (None, None) => Config::load_from_env()?,
        _ => anyhow::bail!("--dataset-config and --test-config must be given together"),
    };
    if args.no_dump {
        config.test.dump_score_table = false;
    }
    log::info!("Configuration loaded successfully");
    log::info!("Train dir: {}", config.dataset.train_dir.display());
    log::info!("Test dir: {}", config.dataset.test_dir.display());

    let dataset = SketchDataset::open(&config.dataset)?;
    let model = load_autoencoder(&weights)?;
    let fingerprint = model.fingerprint().to_string();
    let harness = TestHarness::new(dataset, model, config.test.clone())?.with_fingerprint(fingerprint);

    if !args.skip_decoded {
        harness.dump_decoded_sketches(SketchSet::Test)?;
    }

    let report = harness.perform_testing(mode)?;

    println!("\n=== Retrieval Results (mode {}) ===", mode.index());
    println!(
        "Queries: {} ({})   References: {} ({})",
        report.ranks.num_queries, report.query_set, report.ranks.num_references, report.reference_set
    );
    println!("{:-<40}", "");
    println!("{:<10} {:>12} {:>14}", "Rank", "Hits", "Accuracy");
    println!("{:-<40}", "");
    for r in &report.ranks.ranks {
        println!("{:<10} {:>12} {:>13.2}%", r.rank, r.hits, r.accuracy * 100.0);
    }
    println!("{:-<40}", "");
    println!("MRR: {:.4}", report.ranks.mrr);
    if !report.ranks.unmatched_queries.is_empty() {
        println!(
            "\n{} queries had no reference with the same ID.",
            report.ranks.unmatched_queries.len()
        );
    }

    Ok(())
}
