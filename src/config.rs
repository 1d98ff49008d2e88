use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::eval::DEFAULT_RANKS;

/// Full run configuration: the dataset (common) document plus the test document.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub test: TestConfig,
}

/// Dataset / common configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Directory holding training sketches (full and limited train sets).
    pub train_dir: PathBuf,
    /// Directory holding test (query) sketches.
    pub test_dir: PathBuf,
    /// Optional second test directory.
    #[serde(default)]
    pub test2_dir: Option<PathBuf>,
    #[serde(default = "default_side")]
    pub height: u32,
    #[serde(default = "default_side")]
    pub width: u32,
    /// Sketches stored as {0,1} ink masks instead of [-1,1] intensities.
    #[serde(default)]
    pub use_binary_sketches: bool,
    /// Seed for every random-number consumer (batch shuffling).
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_side() -> u32 {
    64
}

fn default_seed() -> u64 {
    1337
}

/// Test-phase configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TestConfig {
    pub batch_size: usize,
    /// Where score tables and the eval report are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Where decoded / paired sketch images are written.
    #[serde(default = "default_decoded_dir")]
    pub decoded_dir: PathBuf,
    #[serde(default = "default_dump_score_table")]
    pub dump_score_table: bool,
    /// Candidate rank thresholds; filtered per run by reference size.
    #[serde(default = "default_ranks")]
    pub ranks: Vec<usize>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_decoded_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_dump_score_table() -> bool {
    true
}

fn default_ranks() -> Vec<usize> {
    DEFAULT_RANKS.to_vec()
}

/// Parse a config document; `.toml` files are read as TOML, everything else as JSON.
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Config {
    /// Load both config documents from explicit paths and validate them.
    pub fn load(dataset_path: &Path, test_path: &Path) -> Result<Self> {
        let dataset: DatasetConfig = load_document(dataset_path)?;
        let test: TestConfig = load_document(test_path)?;

        let config = Config { dataset, test };
        config.validate()?;

        Ok(config)
    }

    /// Load configuration using environment-provided paths
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Paths are resolved in this order:
    /// 1. SKETCHRET_DATASET_CONFIG / SKETCHRET_TEST_CONFIG environment variables
    /// 2. ./dataset.json / ./test.json in current directory
    pub fn load_from_env() -> Result<Self> {
        // Optional; a missing .env file is fine
        let _ = dotenv::dotenv();

        let dataset_path = std::env::var("SKETCHRET_DATASET_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("dataset.json"));
        let test_path = std::env::var("SKETCHRET_TEST_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("test.json"));

        Self::load(&dataset_path, &test_path)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        for (key, dir) in [
            ("train_dir", &self.dataset.train_dir),
            ("test_dir", &self.dataset.test_dir),
        ] {
            if !dir.is_dir() {
                anyhow::bail!("{} is not a directory: {}", key, dir.display());
            }
        }

        if let Some(ref dir) = self.dataset.test2_dir {
            if !dir.is_dir() {
                anyhow::bail!("test2_dir is not a directory: {}", dir.display());
            }
        }

        if self.dataset.height == 0 || self.dataset.width == 0 {
            anyhow::bail!("height and width must be greater than 0");
        }

        if self.test.batch_size == 0 {
            anyhow::bail!("batch_size must be greater than 0");
        }

        if self.test.ranks.iter().any(|&k| k == 0) {
            anyhow::bail!("ranks must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn json_path(dir: &Path) -> String {
        dir.to_str().unwrap().replace('\\', "\\\\")
    }

    fn write_configs(temp_dir: &TempDir, batch_size: usize) -> (PathBuf, PathBuf) {
        let train = temp_dir.path().join("train");
        let test = temp_dir.path().join("test");
        fs::create_dir_all(&train).unwrap();
        fs::create_dir_all(&test).unwrap();

        let dataset_path = temp_dir.path().join("dataset.json");
        fs::write(
            &dataset_path,
            format!(
                r#"{{"train_dir": "{}", "test_dir": "{}", "height": 32, "width": 32, "use_binary_sketches": true}}"#,
                json_path(&train),
                json_path(&test)
            ),
        )
        .unwrap();

        let test_path = temp_dir.path().join("test.json");
        fs::write(&test_path, format!(r#"{{"batch_size": {}}}"#, batch_size)).unwrap();

        (dataset_path, test_path)
    }

    #[test]
    fn test_config_load_success() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset_path, test_path) = write_configs(&temp_dir, 16);

        let config = Config::load(&dataset_path, &test_path);
        assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
        let config = config.unwrap();
        assert_eq!(config.dataset.height, 32);
        assert!(config.dataset.use_binary_sketches);
        assert_eq!(config.dataset.seed, 1337);
        assert_eq!(config.test.batch_size, 16);
        assert_eq!(config.test.decoded_dir, PathBuf::from("temp"));
        assert!(config.test.dump_score_table);
        assert_eq!(config.test.ranks, DEFAULT_RANKS.to_vec());
    }

    #[test]
    fn test_config_zero_batch_size() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset_path, test_path) = write_configs(&temp_dir, 0);

        let err = Config::load(&dataset_path, &test_path).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_config_missing_train_dir() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset_path, test_path) = write_configs(&temp_dir, 4);
        fs::remove_dir(temp_dir.path().join("train")).unwrap();

        let err = Config::load(&dataset_path, &test_path).unwrap_err();
        assert!(err.to_string().contains("train_dir"));
    }

    #[test]
    fn test_config_toml_test_document() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset_path, _) = write_configs(&temp_dir, 4);
        let toml_path = temp_dir.path().join("test.toml");
        fs::write(
            &toml_path,
            "batch_size = 8\ndump_score_table = false\nranks = [1, 10]\n",
        )
        .unwrap();

        let config = Config::load(&dataset_path, &toml_path).unwrap();
        assert_eq!(config.test.batch_size, 8);
        assert!(!config.test.dump_score_table);
        assert_eq!(config.test.ranks, vec![1, 10]);
    }

    #[test]
    fn test_config_from_env() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let (dataset_path, test_path) = write_configs(&temp_dir, 2);

        std::env::set_var("SKETCHRET_DATASET_CONFIG", &dataset_path);
        std::env::set_var("SKETCHRET_TEST_CONFIG", &test_path);
        let config = Config::load_from_env();
        std::env::remove_var("SKETCHRET_DATASET_CONFIG");
        std::env::remove_var("SKETCHRET_TEST_CONFIG");

        assert_eq!(config.unwrap().test.batch_size, 2);
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        std::env::set_var("SKETCHRET_DATASET_CONFIG", "nonexistent.json");
        let config = Config::load_from_env();
        std::env::remove_var("SKETCHRET_DATASET_CONFIG");
        assert!(config.is_err());
    }
}
