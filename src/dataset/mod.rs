//! Sketch dataset: named sketch sets, image loading, and batch generation.

pub mod batch;
pub mod loader;
pub mod sketch;
pub mod sketch_set;

pub use batch::{padded_len, BatchGenerator};
pub use loader::{list_sketch_files, load_sketch};
pub use sketch::{normalize_pixel, Sketch};
pub use sketch_set::SketchSet;

use crate::config::DatasetConfig;
use crate::error::Result;
use crate::eval::extract_sketch_id;
use std::collections::HashSet;
use std::path::Path;

/// Sketch lists for the three sets, plus how to load them.
#[derive(Debug, Clone)]
pub struct SketchDataset {
    config: DatasetConfig,
    test_list: Vec<String>,
    full_train_list: Vec<String>,
    limited_train_list: Vec<String>,
}

impl SketchDataset {
    /// Scan the train and test directories named in `config`.
    pub fn open(config: &DatasetConfig) -> Result<Self> {
        let train = list_sketch_files(&config.train_dir)?;
        let test = list_sketch_files(&config.test_dir)?;
        Ok(Self::from_lists(config.clone(), train, test))
    }

    /// Build from already known file lists. The limited train list keeps the
    /// train sketches whose ID appears among the test IDs, in train order.
    pub fn from_lists(config: DatasetConfig, full_train_list: Vec<String>, test_list: Vec<String>) -> Self {
        let test_ids: HashSet<&str> = test_list.iter().map(|n| extract_sketch_id(n)).collect();
        let limited_train_list: Vec<String> = full_train_list
            .iter()
            .filter(|n| test_ids.contains(extract_sketch_id(n)))
            .cloned()
            .collect();

        log::info!(
            "Dataset: {} test, {} full train, {} limited train sketches",
            test_list.len(),
            full_train_list.len(),
            limited_train_list.len()
        );

        Self {
            config,
            test_list,
            full_train_list,
            limited_train_list,
        }
    }

    pub fn sketch_list(&self, set: SketchSet) -> &[String] {
        match set {
            SketchSet::Test => &self.test_list,
            SketchSet::FullTrain => &self.full_train_list,
            SketchSet::LimitedTrain => &self.limited_train_list,
        }
    }

    pub fn sketch_dir(&self, set: SketchSet) -> &Path {
        match set {
            SketchSet::Test => &self.config.test_dir,
            SketchSet::FullTrain | SketchSet::LimitedTrain => &self.config.train_dir,
        }
    }

    pub fn use_binary_sketches(&self) -> bool {
        self.config.use_binary_sketches
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn input_dim(&self) -> usize {
        self.config.width as usize * self.config.height as usize
    }

    pub fn load_sketch(&self, set: SketchSet, name: &str) -> Result<Sketch> {
        load_sketch(
            &self.sketch_dir(set).join(name),
            self.config.width,
            self.config.height,
            self.config.use_binary_sketches,
        )
    }

    /// Load the sketches at `indices` of a set's list, in the given order.
    pub fn load_batch(&self, set: SketchSet, indices: &[usize]) -> Result<Vec<Sketch>> {
        let list = self.sketch_list(set);
        indices
            .iter()
            .map(|&i| self.load_sketch(set, &list[i]))
            .collect()
    }

    /// Load every sketch of a set, in list order.
    pub fn load_set(&self, set: SketchSet) -> Result<Vec<Sketch>> {
        self.sketch_list(set)
            .iter()
            .map(|name| self.load_sketch(set, name))
            .collect()
    }

    /// Endless batch generator over a set. Shuffled generators are seeded from the config.
    pub fn batches(&self, set: SketchSet, batch_size: usize, shuffle: bool) -> BatchGenerator {
        let len = self.sketch_list(set).len();
        if shuffle {
            BatchGenerator::shuffled(len, batch_size, self.config.seed)
        } else {
            BatchGenerator::sequential(len, batch_size)
        }
    }
}
