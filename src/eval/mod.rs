//! Evaluation: sketch ID extraction and rank-based metrics (top-K accuracy, MRR).

pub mod ids;
pub mod metrics;

pub use ids::{extract_sketch_id, extract_sketch_ids};
pub use metrics::{
    evaluate, filter_ranks, first_match_position, mean_reciprocal_rank, RankAccuracy, RankReport,
    DEFAULT_RANKS,
};
