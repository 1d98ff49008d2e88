use crate::error::{Result, SketchretError};
use crate::score::distance::euclidean_distance;

/// Pairwise distance matrix between a query group (rows) and a reference group (columns).
///
/// Built once per evaluation run and never mutated afterwards. The row and
/// column ID lists always match the matrix shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    row_ids: Vec<String>,
    col_ids: Vec<String>,
    /// Row-major, `row_ids.len() * col_ids.len()` entries.
    scores: Vec<f32>,
}

impl ScoreTable {
    /// Compute the Euclidean distance of every query vector to every reference vector.
    ///
    /// # Arguments
    ///
    /// * `rows` - Query feature vectors, in `row_ids` order
    /// * `cols` - Reference feature vectors, in `col_ids` order
    /// * `row_ids` - Ground-truth sketch ID of each query
    /// * `col_ids` - Ground-truth sketch ID of each reference
    ///
    /// # Returns
    ///
    /// `SizeMismatch` if an ID list length disagrees with its vector group,
    /// `DimensionMismatch` if any two vectors differ in length
    pub fn compute<R, C>(
        rows: &[R],
        cols: &[C],
        row_ids: Vec<String>,
        col_ids: Vec<String>,
    ) -> Result<Self>
    where
        R: AsRef<[f32]>,
        C: AsRef<[f32]>,
    {
        if row_ids.len() != rows.len() {
            return Err(SketchretError::SizeMismatch {
                what: "rows",
                expected: row_ids.len(),
                actual: rows.len(),
            });
        }
        if col_ids.len() != cols.len() {
            return Err(SketchretError::SizeMismatch {
                what: "cols",
                expected: col_ids.len(),
                actual: cols.len(),
            });
        }

        let mut scores = Vec::with_capacity(rows.len() * cols.len());
        for row in rows {
            for col in cols {
                scores.push(euclidean_distance(row.as_ref(), col.as_ref())?);
            }
        }

        log::debug!(
            "Computed score table: {} rows x {} cols",
            row_ids.len(),
            col_ids.len()
        );

        Ok(Self {
            row_ids,
            col_ids,
            scores,
        })
    }

    /// Build a table from precomputed scores (row-major).
    pub fn from_scores(row_ids: Vec<String>, col_ids: Vec<String>, scores: Vec<f32>) -> Result<Self> {
        let expected = row_ids.len() * col_ids.len();
        if scores.len() != expected {
            return Err(SketchretError::SizeMismatch {
                what: "scores",
                expected,
                actual: scores.len(),
            });
        }
        Ok(Self {
            row_ids,
            col_ids,
            scores,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn num_cols(&self) -> usize {
        self.col_ids.len()
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn col_ids(&self) -> &[String] {
        &self.col_ids
    }

    /// Distances of one query to every reference, in column order.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows()`
    pub fn row(&self, row: usize) -> &[f32] {
        let n = self.num_cols();
        &self.scores[row * n..(row + 1) * n]
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.row(row)[col]
    }

    /// Column indices of a row sorted by ascending distance.
    ///
    /// Stable: equal distances keep their original column order.
    pub fn sorted_indices(&self, row: usize) -> Vec<usize> {
        let scores = self.row(row);
        let mut idx: Vec<usize> = (0..scores.len()).collect();
        idx.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
        idx
    }

    /// Reference IDs of a row ordered nearest first.
    pub fn sorted_ids(&self, row: usize) -> Vec<&str> {
        self.sorted_indices(row)
            .into_iter()
            .map(|j| self.col_ids[j].as_str())
            .collect()
    }

    /// Distances of a row in ascending order.
    pub fn sorted_scores(&self, row: usize) -> Vec<f32> {
        let scores = self.row(row);
        self.sorted_indices(row)
            .into_iter()
            .map(|j| scores[j])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compute_shape_and_values() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let cols: Vec<Vec<f32>> = vec![vec![3.0, 4.0], vec![0.0, 0.0], vec![1.0, 1.0]];
        let table = ScoreTable::compute(&rows, &cols, ids(&["a", "b"]), ids(&["x", "y", "z"])).unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_cols(), 3);
        assert!((table.get(0, 0) - 5.0).abs() < 1e-6);
        assert_eq!(table.get(0, 1), 0.0);
        assert_eq!(table.get(1, 2), 0.0);
    }

    #[test]
    fn test_compute_symmetric_groups() {
        let group: Vec<Vec<f32>> = vec![vec![1.0, 2.0, 3.0], vec![-1.0, 0.5, 2.0], vec![7.0, 0.0, -3.0]];
        let names = ids(&["1", "2", "3"]);
        let table = ScoreTable::compute(&group, &group, names.clone(), names).unwrap();
        for i in 0..3 {
            assert_eq!(table.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(table.get(i, j), table.get(j, i));
            }
        }
    }

    #[test]
    fn test_compute_row_id_mismatch_is_error() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0]];
        let cols: Vec<Vec<f32>> = vec![vec![0.0]];
        let err = ScoreTable::compute(&rows, &cols, ids(&["a", "b"]), ids(&["x"])).unwrap_err();
        assert!(matches!(
            err,
            SketchretError::SizeMismatch { what: "rows", expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_compute_col_id_mismatch_is_error() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0]];
        let cols: Vec<Vec<f32>> = vec![vec![0.0], vec![1.0]];
        let err = ScoreTable::compute(&rows, &cols, ids(&["a"]), ids(&["x"])).unwrap_err();
        assert!(matches!(err, SketchretError::SizeMismatch { what: "cols", .. }));
    }

    #[test]
    fn test_compute_dimension_mismatch_is_error() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0, 1.0]];
        let cols: Vec<Vec<f32>> = vec![vec![0.0]];
        let err = ScoreTable::compute(&rows, &cols, ids(&["a"]), ids(&["x"])).unwrap_err();
        assert!(matches!(err, SketchretError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_sorted_views_are_consistent() {
        let table = ScoreTable::from_scores(
            ids(&["q"]),
            ids(&["a", "b", "c", "d"]),
            vec![0.9, 0.1, 0.5, 0.3],
        )
        .unwrap();

        assert_eq!(table.sorted_indices(0), vec![1, 3, 2, 0]);
        assert_eq!(table.sorted_ids(0), vec!["b", "d", "c", "a"]);
        let sorted = table.sorted_scores(0);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

        let mut permuted: Vec<&str> = table.sorted_ids(0);
        permuted.sort();
        assert_eq!(permuted, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_ties_keep_column_order() {
        let table =
            ScoreTable::from_scores(ids(&["q"]), ids(&["a", "b", "c"]), vec![1.0, 0.5, 0.5]).unwrap();
        assert_eq!(table.sorted_indices(0), vec![1, 2, 0]);
    }

    #[test]
    fn test_from_scores_wrong_length() {
        let err = ScoreTable::from_scores(ids(&["q"]), ids(&["a", "b"]), vec![1.0]).unwrap_err();
        assert!(matches!(err, SketchretError::SizeMismatch { what: "scores", .. }));
    }

    #[test]
    fn test_empty_reference_group() {
        let rows: Vec<Vec<f32>> = vec![vec![1.0]];
        let cols: Vec<Vec<f32>> = Vec::new();
        let table = ScoreTable::compute(&rows, &cols, ids(&["a"]), Vec::new()).unwrap();
        assert_eq!(table.num_cols(), 0);
        assert!(table.row(0).is_empty());
        assert!(table.sorted_ids(0).is_empty());
    }
}
