//! Output writers: score table CSVs and sketch debug images.

pub mod sketches;
pub mod table;

pub use sketches::{
    sketch_to_gray, stack_vertical, write_decoded_sketches, write_sketch_pairs, PairDumpSummary,
    RescalePolicy,
};
pub use table::{
    dump_score_table, ScoreTableFiles, SCORE_TABLE_FILE, SORTED_IDS_FILE, SORTED_SCORES_FILE,
};
