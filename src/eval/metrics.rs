//! Rank-based retrieval metrics over a score table: top-K accuracy and Mean Reciprocal Rank (MRR).

use crate::score::ScoreTable;
use serde::Serialize;

/// Candidate rank thresholds, ascending.
pub const DEFAULT_RANKS: [usize; 7] = [1, 5, 10, 20, 50, 100, 200];

/// Keep the ranks that do not exceed the reference-group size, sorted ascending.
/// Duplicates are dropped.
pub fn filter_ranks(candidates: &[usize], reference_size: usize) -> Vec<usize> {
    let mut ranks: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&k| k > 0 && k <= reference_size)
        .collect();
    ranks.sort_unstable();
    ranks.dedup();
    ranks
}

/// Accuracy at a single rank threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankAccuracy {
    pub rank: usize,
    pub hits: usize,
    pub accuracy: f32,
}

/// Outcome of evaluating one score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankReport {
    pub num_queries: usize,
    pub num_references: usize,
    pub ranks: Vec<RankAccuracy>,
    pub mrr: f32,
    /// Zero-based position of the first true match per query, `None` if the ID is absent.
    pub match_positions: Vec<Option<usize>>,
    /// Query IDs with no reference of the same ID.
    pub unmatched_queries: Vec<String>,
}

impl RankReport {
    /// Accuracy at `rank`, if it was evaluated.
    pub fn accuracy_at(&self, rank: usize) -> Option<f32> {
        self.ranks.iter().find(|r| r.rank == rank).map(|r| r.accuracy)
    }
}

/// Position of the first column (nearest first) whose ID equals the row's ID.
pub fn first_match_position(table: &ScoreTable, row: usize) -> Option<usize> {
    let target = &table.row_ids()[row];
    table
        .sorted_indices(row)
        .into_iter()
        .position(|j| &table.col_ids()[j] == target)
}

/// Evaluate a score table against the given rank thresholds.
///
/// For each query, columns are sorted by ascending distance and the position of
/// the first reference with the same ID counts as a hit for every rank `k` with
/// `position < k`. Accuracy is hits over the number of queries (0.0 when there are none).
pub fn evaluate(table: &ScoreTable, ranks: &[usize]) -> RankReport {
    let num_queries = table.num_rows();
    let mut hits = vec![0usize; ranks.len()];
    let mut match_positions = Vec::with_capacity(num_queries);
    let mut unmatched_queries = Vec::new();

    for row in 0..num_queries {
        let position = first_match_position(table, row);
        match position {
            Some(pos) => {
                for (slot, &k) in hits.iter_mut().zip(ranks.iter()) {
                    if pos < k {
                        *slot += 1;
                    }
                }
            }
            None => {
                log::warn!(
                    "Query ID {} has no matching reference; counted as a miss",
                    table.row_ids()[row]
                );
                unmatched_queries.push(table.row_ids()[row].clone());
            }
        }
        match_positions.push(position);
    }

    let ranks = ranks
        .iter()
        .zip(hits)
        .map(|(&rank, hits)| RankAccuracy {
            rank,
            hits,
            accuracy: if num_queries == 0 {
                0.0
            } else {
                hits as f32 / num_queries as f32
            },
        })
        .collect();

    RankReport {
        num_queries,
        num_references: table.num_cols(),
        ranks,
        mrr: mean_reciprocal_rank(&match_positions),
        match_positions,
        unmatched_queries,
    }
}

/// Mean Reciprocal Rank: average of 1/(position+1) of the first true match per query.
/// Queries without a match add 0. Returns 0.0 if there are no queries.
pub fn mean_reciprocal_rank(match_positions: &[Option<usize>]) -> f32 {
    if match_positions.is_empty() {
        return 0.0;
    }
    let sum: f32 = match_positions
        .iter()
        .map(|p| p.map(|pos| 1.0 / (pos + 1) as f32).unwrap_or(0.0))
        .sum();
    sum / match_positions.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filter_ranks_small_reference() {
        assert_eq!(filter_ranks(&DEFAULT_RANKS, 8), vec![1, 5]);
    }

    #[test]
    fn filter_ranks_keeps_equal_to_size() {
        assert_eq!(filter_ranks(&DEFAULT_RANKS, 20), vec![1, 5, 10, 20]);
        assert_eq!(filter_ranks(&DEFAULT_RANKS, 1000), DEFAULT_RANKS.to_vec());
    }

    #[test]
    fn filter_ranks_sorts_and_dedups() {
        assert_eq!(filter_ranks(&[10, 1, 5, 1, 0], 50), vec![1, 5, 10]);
        assert!(filter_ranks(&DEFAULT_RANKS, 0).is_empty());
    }

    #[test]
    fn diagonal_match_gives_full_rank1_accuracy() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0, 0.0], vec![5.0, 0.0], vec![0.0, 5.0]];
        let cols = rows.clone();
        let table =
            ScoreTable::compute(&rows, &cols, ids(&["1", "2", "3"]), ids(&["1", "2", "3"])).unwrap();
        let ranks = filter_ranks(&DEFAULT_RANKS, table.num_cols());
        let report = evaluate(&table, &ranks);

        assert_eq!(ranks, vec![1]);
        assert!((report.accuracy_at(1).unwrap() - 1.0).abs() < 1e-6);
        assert!((report.mrr - 1.0).abs() < 1e-6);
        assert!(report.unmatched_queries.is_empty());
    }

    #[test]
    fn second_position_counts_at_rank5_only() {
        // Query "a" is nearest to "b", then "a".
        let table = ScoreTable::from_scores(
            ids(&["a"]),
            ids(&["b", "a", "c", "d", "e", "f"]),
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
        )
        .unwrap();
        let report = evaluate(&table, &[1, 5]);

        assert_eq!(report.match_positions, vec![Some(1)]);
        assert_eq!(report.accuracy_at(1), Some(0.0));
        assert_eq!(report.accuracy_at(5), Some(1.0));
        assert!((report.mrr - 0.5).abs() < 1e-6);
    }

    #[test]
    fn first_of_several_matches_is_used() {
        let table = ScoreTable::from_scores(
            ids(&["a"]),
            ids(&["x", "a", "a"]),
            vec![0.1, 0.9, 0.2],
        )
        .unwrap();
        assert_eq!(first_match_position(&table, 0), Some(1));
    }

    #[test]
    fn unmatched_query_is_a_miss() {
        let table = ScoreTable::from_scores(
            ids(&["a", "z"]),
            ids(&["a", "b"]),
            vec![0.0, 1.0, 0.5, 0.5],
        )
        .unwrap();
        let report = evaluate(&table, &[1]);

        assert_eq!(report.unmatched_queries, vec!["z".to_string()]);
        assert_eq!(report.match_positions, vec![Some(0), None]);
        assert!((report.accuracy_at(1).unwrap() - 0.5).abs() < 1e-6);
        assert!((report.mrr - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_queries() {
        let table = ScoreTable::from_scores(Vec::new(), ids(&["a"]), Vec::new()).unwrap();
        let report = evaluate(&table, &[1]);
        assert_eq!(report.num_queries, 0);
        assert_eq!(report.accuracy_at(1), Some(0.0));
        assert_eq!(report.mrr, 0.0);
    }

    #[test]
    fn mrr_empty() {
        assert_eq!(mean_reciprocal_rank(&[]), 0.0);
    }
}
