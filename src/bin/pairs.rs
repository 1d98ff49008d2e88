//! Pair dump CLI: write train/test sketch pairs that share an ID, for visual inspection.

use clap::Parser;
use sketchret::dataset::{SketchDataset, SketchSet};
use sketchret::dump::write_sketch_pairs;
use sketchret::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pairs")]
struct Args {
    /// Dataset (common) config; defaults to $SKETCHRET_DATASET_CONFIG or dataset.json.
    #[arg(long)]
    dataset_config: Option<PathBuf>,

    /// Test config; defaults to $SKETCHRET_TEST_CONFIG or test.json.
    #[arg(long)]
    test_config: Option<PathBuf>,

    /// Output directory (default: decoded_dir from the test config).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match (&args.dataset_config, &args.test_config) {
        (Some(dataset), Some(test)) => Config::load(dataset, test)?,
        (None, None) => Config::load_from_env()?,
        _ => anyhow::bail!("--dataset-config and --test-config must be given together"),
    };
    let out_dir = args.out_dir.unwrap_or_else(|| config.test.decoded_dir.clone());

    let dataset = SketchDataset::open(&config.dataset)?;
    let test_sketches = dataset.load_set(SketchSet::Test)?;
    let train_sketches = dataset.load_set(SketchSet::FullTrain)?;

    let summary = write_sketch_pairs(
        dataset.sketch_list(SketchSet::Test),
        &test_sketches,
        dataset.sketch_list(SketchSet::FullTrain),
        &train_sketches,
        &out_dir,
    )?;

    println!("Pairs written: {}", summary.written);
    println!("Skipped (no test match): {}", summary.skipped.len());

    Ok(())
}
