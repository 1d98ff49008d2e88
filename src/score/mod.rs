//! Score computation: pairwise Euclidean distance tables between feature-vector groups.

pub mod distance;
pub mod table;

pub use distance::euclidean_distance;
pub use table::ScoreTable;
