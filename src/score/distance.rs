use crate::error::{Result, SketchretError};

/// Euclidean (L2) distance between two flattened feature vectors.
///
/// # Arguments
///
/// * `a` - First vector
/// * `b` - Second vector (must have same length as `a`)
///
/// # Returns
///
/// `||a - b||_2`, or `DimensionMismatch` if the lengths differ
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SketchretError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    // Accumulate in f64 so long vectors don't lose precision before the cast
    let sum_sq: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum();

    Ok(sum_sq.sqrt() as f32)
}
