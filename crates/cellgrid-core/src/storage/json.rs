//! JSON snapshot encoding: one object keyed by `"{row}-{col}"`, or the row-array
//! shape the remote save endpoint takes.

use super::Snapshot;
use crate::error::Result;

/// Accepts either shape; a top-level array is read as rows.
pub fn parse_json_content(content: &str) -> Result<Snapshot> {
    if content.trim_start().starts_with('[') {
        return parse_rows_json(content);
    }
    Ok(serde_json::from_str(content)?)
}

pub fn write_json_content(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)? + "\n")
}

/// Row-array shape: `[["a", ""], ["", "b"]]`.
pub fn write_rows_json(snapshot: &Snapshot, rows: usize, cols: usize) -> Result<String> {
    Ok(serde_json::to_string(&snapshot.to_rows(rows, cols))?)
}

pub fn parse_rows_json(content: &str) -> Result<Snapshot> {
    let rows: Vec<Vec<String>> = serde_json::from_str(content)?;
    Ok(Snapshot::from_rows(&rows))
}
