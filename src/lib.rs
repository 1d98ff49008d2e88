pub mod config;
pub mod error;
pub mod dataset;
pub mod model;
pub mod score;
pub mod eval;
pub mod dump;
pub mod harness;

pub use config::Config;
pub use error::{SketchretError, Result};
pub use harness::{EvalReport, TestHarness, TestMode};
