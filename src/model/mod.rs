//! Model collaborator: encoder/decoder traits and the checkpoint-loaded dense autoencoder.

pub mod dense;

pub use dense::{Activation, Checkpoint, DenseAutoencoder, DenseLayer};

use crate::dataset::Sketch;
use crate::error::{Result, SketchretError};
use std::path::Path;

/// Maps sketches to fixed-length feature vectors.
pub trait Encoder {
    fn input_dim(&self) -> usize;

    fn feature_dim(&self) -> usize;

    /// Encode a batch, one flattened feature vector per sketch, in input order.
    fn encode(&self, batch: &[Sketch]) -> Result<Vec<Vec<f32>>>;
}

/// Reconstructs sketches from feature vectors.
pub trait Decoder {
    fn decode(&self, features: &[Vec<f32>], width: u32, height: u32) -> Result<Vec<Sketch>>;
}

/// Encoder and decoder sharing one set of weights.
pub trait Autoencoder: Encoder + Decoder {
    /// Encode then decode a batch; output sketches take the shape of the first input.
    fn reconstruct(&self, batch: &[Sketch]) -> Result<Vec<Sketch>> {
        let Some(first) = batch.first() else {
            return Ok(Vec::new());
        };
        let features = self.encode(batch)?;
        self.decode(&features, first.width(), first.height())
    }
}

/// Load the encoder half of a checkpoint.
pub fn load_encoder(path: &Path) -> Result<DenseAutoencoder> {
    DenseAutoencoder::load(path)
}

/// Load the full autoencoder from the same checkpoint file.
pub fn load_autoencoder(path: &Path) -> Result<DenseAutoencoder> {
    DenseAutoencoder::load(path)
}

/// Encode sketches in batches of `batch_size`, preserving order.
///
/// Fails if the encoder returns a different number of vectors than it was given.
pub fn encode_all<E: Encoder + ?Sized>(
    encoder: &E,
    sketches: &[Sketch],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    if batch_size == 0 {
        return Err(SketchretError::InvalidInput("batch_size must be greater than 0".to_string()));
    }

    let mut vectors = Vec::with_capacity(sketches.len());
    for (batch_id, batch) in sketches.chunks(batch_size).enumerate() {
        let encoded = encoder.encode(batch)?;
        if encoded.len() != batch.len() {
            return Err(SketchretError::SizeMismatch {
                what: "encoded batch",
                expected: batch.len(),
                actual: encoded.len(),
            });
        }
        log::debug!("Encoded batch {} ({} sketches)", batch_id, batch.len());
        vectors.extend(encoded);
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encoder that returns each sketch's pixel sum, optionally dropping the last vector.
    struct SumEncoder {
        drop_last: bool,
    }

    impl Encoder for SumEncoder {
        fn input_dim(&self) -> usize {
            1
        }

        fn feature_dim(&self) -> usize {
            1
        }

        fn encode(&self, batch: &[Sketch]) -> Result<Vec<Vec<f32>>> {
            let mut out: Vec<Vec<f32>> = batch.iter().map(|s| vec![s.data().iter().sum()]).collect();
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }
    }

    fn sketches(n: usize) -> Vec<Sketch> {
        (0..n).map(|i| Sketch::new(1, 1, vec![i as f32]).unwrap()).collect()
    }

    #[test]
    fn test_encode_all_preserves_order_across_batches() {
        let vectors = encode_all(&SumEncoder { drop_last: false }, &sketches(7), 3).unwrap();
        let flat: Vec<f32> = vectors.into_iter().flatten().collect();
        assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_encode_all_count_mismatch_fails_fast() {
        let err = encode_all(&SumEncoder { drop_last: true }, &sketches(4), 2).unwrap_err();
        assert!(matches!(err, SketchretError::SizeMismatch { what: "encoded batch", .. }));
    }

    #[test]
    fn test_encode_all_zero_batch() {
        assert!(encode_all(&SumEncoder { drop_last: false }, &sketches(1), 0).is_err());
    }
}
