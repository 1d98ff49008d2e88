use crate::error::Result;
use crate::score::ScoreTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SCORE_TABLE_FILE: &str = "score_table.csv";
pub const SORTED_IDS_FILE: &str = "score_table_sorted_IDs.csv";
pub const SORTED_SCORES_FILE: &str = "score_table_sorted_scores.csv";

/// Paths of the three files written by [`dump_score_table`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTableFiles {
    pub scores: PathBuf,
    pub sorted_ids: PathBuf,
    pub sorted_scores: PathBuf,
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

fn write_row<W, I, S>(w: &mut W, fields: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            w.write_all(b",")?;
        }
        first = false;
        w.write_all(escape_field(field.as_ref()).as_bytes())?;
    }
    w.write_all(b"\r\n")
}

/// Write rows framed as `[row_ID, ":", values...]`, optionally preceded by a header.
fn write_framed<F>(path: &Path, table: &ScoreTable, header: bool, mut values: F) -> Result<()>
where
    F: FnMut(usize) -> Vec<String>,
{
    let mut w = BufWriter::new(File::create(path)?);

    if header {
        let head = ["", ":"]
            .into_iter()
            .chain(table.col_ids().iter().map(String::as_str));
        write_row(&mut w, head)?;
    }

    for (row, row_id) in table.row_ids().iter().enumerate() {
        let fields = [row_id.clone(), ":".to_string()].into_iter().chain(values(row));
        write_row(&mut w, fields)?;
    }

    w.flush()?;
    Ok(())
}

/// Persist a score table and its row-wise sorted views into `out_dir`.
///
/// * `score_table.csv` - header `["", ":", col IDs...]`, then `[row ID, ":", distances...]`
/// * `score_table_sorted_IDs.csv` - `[row ID, ":", col IDs nearest first...]`
/// * `score_table_sorted_scores.csv` - `[row ID, ":", ascending distances...]`
///
/// The sorted files carry no header row. Writes are not atomic.
/// Distances are written as the shortest text that round-trips the `f32`
/// (`0.1`, not the widened double `0.10000000149011612`).
pub fn dump_score_table(table: &ScoreTable, out_dir: &Path) -> Result<ScoreTableFiles> {
    std::fs::create_dir_all(out_dir)?;

    let files = ScoreTableFiles {
        scores: out_dir.join(SCORE_TABLE_FILE),
        sorted_ids: out_dir.join(SORTED_IDS_FILE),
        sorted_scores: out_dir.join(SORTED_SCORES_FILE),
    };

    write_framed(&files.scores, table, true, |row| {
        table.row(row).iter().map(|s| s.to_string()).collect()
    })?;
    write_framed(&files.sorted_ids, table, false, |row| {
        table.sorted_ids(row).into_iter().map(String::from).collect()
    })?;
    write_framed(&files.sorted_scores, table, false, |row| {
        table.sorted_scores(row).iter().map(|s| s.to_string()).collect()
    })?;

    log::info!(
        "Score table ({} x {}) written to {}",
        table.num_rows(),
        table.num_cols(),
        out_dir.display()
    );
    Ok(files)
}
