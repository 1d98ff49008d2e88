//! Endless batch generator over a sketch list.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Number of items produced when `len` items are drawn in whole batches.
pub fn padded_len(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    (len + batch_size - 1) / batch_size * batch_size
}

/// Yields batches of indices into a list of `len` items, forever.
///
/// Batches always hold `batch_size` indices: when the list runs out mid-batch
/// the generator wraps around to the start (reshuffling first if a seed was
/// given). Yields nothing for an empty list or a zero batch size.
#[derive(Debug)]
pub struct BatchGenerator {
    order: Vec<usize>,
    cursor: usize,
    batch_size: usize,
    rng: Option<StdRng>,
}

impl BatchGenerator {
    /// In-order generator.
    pub fn sequential(len: usize, batch_size: usize) -> Self {
        Self {
            order: (0..len).collect(),
            cursor: 0,
            batch_size,
            rng: None,
        }
    }

    /// Generator that visits items in a fresh seeded permutation every epoch.
    pub fn shuffled(len: usize, batch_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut rng);
        Self {
            order,
            cursor: 0,
            batch_size,
            rng: Some(rng),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn wrap(&mut self) {
        self.cursor = 0;
        if let Some(rng) = self.rng.as_mut() {
            self.order.shuffle(rng);
        }
    }
}

impl Iterator for BatchGenerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.order.is_empty() || self.batch_size == 0 {
            return None;
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            if self.cursor == self.order.len() {
                self.wrap();
            }
            batch.push(self.order[self.cursor]);
            self.cursor += 1;
        }
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_len_rounds_up() {
        assert_eq!(padded_len(10, 4), 12);
        assert_eq!(padded_len(8, 4), 8);
        assert_eq!(padded_len(0, 4), 0);
        assert_eq!(padded_len(3, 0), 0);
    }

    #[test]
    fn sequential_wraps_and_trims_back() {
        let num_sketches = 10;
        let batch_size = 4;
        let num_batches = padded_len(num_sketches, batch_size) / batch_size;

        let generated: Vec<usize> = BatchGenerator::sequential(num_sketches, batch_size)
            .take(num_batches)
            .flatten()
            .collect();
        assert_eq!(generated.len(), 12);
        assert_eq!(&generated[10..], &[0, 1]);

        let trimmed = &generated[..num_sketches];
        assert_eq!(trimmed, (0..10).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn shuffled_is_deterministic_per_seed() {
        let a: Vec<Vec<usize>> = BatchGenerator::shuffled(20, 5, 7).take(6).collect();
        let b: Vec<Vec<usize>> = BatchGenerator::shuffled(20, 5, 7).take(6).collect();
        assert_eq!(a, b, "same seed should yield identical batches");
    }

    #[test]
    fn shuffled_epoch_is_a_permutation() {
        let mut epoch: Vec<usize> = BatchGenerator::shuffled(12, 4, 42).take(3).flatten().collect();
        epoch.sort_unstable();
        assert_eq!(epoch, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn empty_list_yields_nothing() {
        assert!(BatchGenerator::sequential(0, 4).next().is_none());
        assert!(BatchGenerator::sequential(3, 0).next().is_none());
    }

    #[test]
    fn batch_larger_than_list_repeats_items() {
        let batch = BatchGenerator::sequential(2, 5).next().unwrap();
        assert_eq!(batch, vec![0, 1, 0, 1, 0]);
    }
}
