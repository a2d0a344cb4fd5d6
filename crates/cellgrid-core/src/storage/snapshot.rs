//! The unit exchanged with persistence: the whole grid as raw content.

use cellgrid_engine::engine::CellRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::GridError;

/// Full grid contents keyed by coordinate. Holds non-empty cells only.
///
/// Serializes as a map keyed by `"{row}-{col}"`:
///
/// ```text
/// { "0-0": "5", "0-1": "=A1+1" }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Snapshot {
    cells: BTreeMap<CellRef, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: BTreeMap<CellRef, String>) -> Self {
        Snapshot {
            cells: cells.into_iter().filter(|(_, v)| !v.is_empty()).collect(),
        }
    }

    pub fn insert(&mut self, cell_ref: CellRef, value: &str) {
        if value.is_empty() {
            self.cells.remove(&cell_ref);
        } else {
            self.cells.insert(cell_ref, value.to_string());
        }
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&str> {
        self.cells.get(cell_ref).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major iteration.
    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &String)> {
        self.cells.iter()
    }

    pub fn into_cells(self) -> BTreeMap<CellRef, String> {
        self.cells
    }

    /// Dense row arrays covering `rows` x `cols`, empty strings for empty cells.
    /// Content outside the bounds is left out.
    pub fn to_rows(&self, rows: usize, cols: usize) -> Vec<Vec<String>> {
        let mut out = vec![vec![String::new(); cols]; rows];
        for (cell_ref, value) in &self.cells {
            if cell_ref.row < rows && cell_ref.col < cols {
                out[cell_ref.row][cell_ref.col] = value.clone();
            }
        }
        out
    }

    /// Inverse of [`Snapshot::to_rows`]. Ragged rows are fine.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let mut snapshot = Snapshot::new();
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                snapshot.insert(CellRef::new(row, col), value);
            }
        }
        snapshot
    }
}

impl TryFrom<BTreeMap<String, String>> for Snapshot {
    type Error = GridError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut cells = BTreeMap::new();
        for (key, value) in map {
            let cell_ref =
                CellRef::from_key(&key).ok_or_else(|| GridError::InvalidCellKey(key.clone()))?;
            cells.insert(cell_ref, value);
        }
        Ok(Snapshot::from_cells(cells))
    }
}

impl From<Snapshot> for BTreeMap<String, String> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot
            .cells
            .into_iter()
            .map(|(cell_ref, value)| (cell_ref.key(), value))
            .collect()
    }
}
