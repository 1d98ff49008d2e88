//! Test harness: encodes the query and reference sketch sets, scores, evaluates and dumps.

use crate::config::TestConfig;
use crate::dataset::{padded_len, Sketch, SketchDataset, SketchSet};
use crate::dump::{dump_score_table, write_decoded_sketches, RescalePolicy};
use crate::error::{Result, SketchretError};
use crate::eval::{evaluate, extract_sketch_ids, filter_ranks, RankReport};
use crate::model::{encode_all, Autoencoder};
use crate::score::ScoreTable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "eval_report.json";

/// Which reference group the test set is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    /// Mode 0: test set vs full train set.
    FullTrain,
    /// Mode 1: test set vs limited train set.
    LimitedTrain,
    /// Mode 2: resolves to the same reference group as mode 0.
    Secondary,
}

impl TestMode {
    pub fn reference_set(self) -> SketchSet {
        match self {
            TestMode::FullTrain | TestMode::Secondary => SketchSet::FullTrain,
            TestMode::LimitedTrain => SketchSet::LimitedTrain,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            TestMode::FullTrain => 0,
            TestMode::LimitedTrain => 1,
            TestMode::Secondary => 2,
        }
    }
}

impl TryFrom<i64> for TestMode {
    type Error = SketchretError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(TestMode::FullTrain),
            1 => Ok(TestMode::LimitedTrain),
            2 => Ok(TestMode::Secondary),
            other => Err(SketchretError::InvalidTestMode(other)),
        }
    }
}

/// Summary of one `perform_testing` run.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub generated_at: DateTime<Utc>,
    pub test_mode: u8,
    pub query_set: SketchSet,
    pub reference_set: SketchSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_table_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub ranks: RankReport,
}

/// Write a report as pretty JSON.
pub fn write_report(report: &EvalReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Runs inference and evaluation over a dataset with a pretrained autoencoder.
pub struct TestHarness<M> {
    dataset: SketchDataset,
    model: M,
    config: TestConfig,
    fingerprint: Option<String>,
}

impl<M: Autoencoder> TestHarness<M> {
    pub fn new(dataset: SketchDataset, model: M, config: TestConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(SketchretError::Config("batch_size must be greater than 0".to_string()));
        }
        if model.input_dim() != dataset.input_dim() {
            return Err(SketchretError::DimensionMismatch {
                expected: dataset.input_dim(),
                actual: model.input_dim(),
            });
        }
        log::info!("Encoded feature size: {}", model.feature_dim());
        Ok(Self {
            dataset,
            model,
            config,
            fingerprint: None,
        })
    }

    /// Record the checkpoint fingerprint in produced reports.
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn dataset(&self) -> &SketchDataset {
        &self.dataset
    }

    /// Feature vectors for every sketch of a set, in list order.
    pub fn encode_set(&self, set: SketchSet) -> Result<Vec<Vec<f32>>> {
        let expected = self.dataset.sketch_list(set).len();
        let sketches = self.dataset.load_set(set)?;
        let vectors = encode_all(&self.model, &sketches, self.config.batch_size)?;
        if vectors.len() != expected {
            return Err(SketchretError::SizeMismatch {
                what: set.tag(),
                expected,
                actual: vectors.len(),
            });
        }
        log::info!("Encoded {} sketches of {}", vectors.len(), set);
        Ok(vectors)
    }

    /// Score table of the test set (rows) against the mode's reference set (columns).
    pub fn build_score_table(&self, mode: TestMode) -> Result<ScoreTable> {
        let query = SketchSet::Test;
        let reference = mode.reference_set();

        let rows = self.encode_set(query)?;
        let cols = self.encode_set(reference)?;

        let row_ids = extract_sketch_ids(self.dataset.sketch_list(query));
        let col_ids = extract_sketch_ids(self.dataset.sketch_list(reference));

        ScoreTable::compute(&rows, &cols, row_ids, col_ids)
    }

    /// Compute rank-based accuracy for `mode`, dumping score tables and the
    /// report when enabled in the test config.
    pub fn perform_testing(&self, mode: TestMode) -> Result<EvalReport> {
        let table = self.build_score_table(mode)?;

        log::info!("Computing rank-based accuracy...");
        let ranks = filter_ranks(&self.config.ranks, table.num_cols());
        let rank_report = evaluate(&table, &ranks);

        for r in &rank_report.ranks {
            log::info!(
                "Rank {:>3}: {:6.2}% ({}/{})",
                r.rank,
                r.accuracy * 100.0,
                r.hits,
                rank_report.num_queries
            );
        }
        log::info!("MRR: {:.4}", rank_report.mrr);

        let score_table_dir = if self.config.dump_score_table {
            dump_score_table(&table, &self.config.output_dir)?;
            Some(self.config.output_dir.clone())
        } else {
            None
        };

        let report = EvalReport {
            generated_at: Utc::now(),
            test_mode: mode.index(),
            query_set: SketchSet::Test,
            reference_set: mode.reference_set(),
            checkpoint_sha256: self.fingerprint.clone(),
            score_table_dir,
            ranks: rank_report,
        };

        if self.config.dump_score_table {
            write_report(&report, &self.config.output_dir.join(REPORT_FILE))?;
        }

        Ok(report)
    }

    /// Run a set through the autoencoder in whole batches and trim the
    /// wrap-around padding. Returns `(originals, reconstructions)` in list order.
    pub fn reconstruct_set(&self, set: SketchSet) -> Result<(Vec<Sketch>, Vec<Sketch>)> {
        let num_sketches = self.dataset.sketch_list(set).len();
        let batch_size = self.config.batch_size;
        let num_batches = padded_len(num_sketches, batch_size) / batch_size;

        let mut originals = Vec::with_capacity(num_batches * batch_size);
        let mut decoded = Vec::with_capacity(num_batches * batch_size);

        for (batch_id, indices) in self
            .dataset
            .batches(set, batch_size, false)
            .take(num_batches)
            .enumerate()
        {
            let batch = self.dataset.load_batch(set, &indices)?;
            let reconstructed = self.model.reconstruct(&batch)?;
            log::debug!("Decoded batch {}/{} of {}", batch_id + 1, num_batches, set);
            originals.extend(batch);
            decoded.extend(reconstructed);
        }

        // Drop the extra sketches introduced by batch rounding
        originals.truncate(num_sketches);
        decoded.truncate(num_sketches);

        Ok((originals, decoded))
    }

    /// Write `decoded_<name>` images (original above reconstruction) for a set.
    pub fn dump_decoded_sketches(&self, set: SketchSet) -> Result<usize> {
        let (originals, decoded) = self.reconstruct_set(set)?;
        write_decoded_sketches(
            self.dataset.sketch_list(set),
            &originals,
            &decoded,
            RescalePolicy::for_sketches(self.dataset.use_binary_sketches()),
            &self.config.decoded_dir,
        )
    }
}
