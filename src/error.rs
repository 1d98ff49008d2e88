use thiserror::Error;

/// Main error type for Sketchret
#[derive(Error, Debug)]
pub enum SketchretError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sketch image decode/encode errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (checkpoint, report) errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sketch set tag that names none of the known partitions
    #[error("Unknown sketch set: {0} (expected test_set, full_train_set or limited_train_set)")]
    UnknownSketchSet(String),

    /// Test mode outside 0..=2
    #[error("Invalid test mode: {0} (expected 0, 1 or 2)")]
    InvalidTestMode(i64),

    /// Item count disagrees with its ID list or batch
    #[error("Size mismatch: {what} expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Feature vectors of different lengths
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Checkpoint content is malformed
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using SketchretError
pub type Result<T> = std::result::Result<T, SketchretError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SketchretError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = SketchretError::SizeMismatch {
            what: "rows",
            expected: 3,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("rows"));
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SketchretError = io_err.into();
        assert!(matches!(err, SketchretError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SketchretError = json_err.into();
        assert!(matches!(err, SketchretError::Json(_)));
    }
}
