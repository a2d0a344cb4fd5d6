//! Sparse cell storage.

use cellgrid_engine::engine::CellRef;
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Sparse map from coordinate to raw cell content.
///
/// An absent key is an empty cell, and writing the empty string removes the key, so
/// the map only ever holds non-empty content.
#[derive(Debug, Default)]
pub struct GridStore {
    cells: DashMap<CellRef, String>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing mapping. Empty values are dropped.
    pub fn from_cells(cells: BTreeMap<CellRef, String>) -> Self {
        let map = DashMap::new();
        for (cell_ref, value) in cells {
            if !value.is_empty() {
                map.insert(cell_ref, value);
            }
        }
        GridStore { cells: map }
    }

    /// Raw content of a cell; empty string when absent.
    pub fn get(&self, cell_ref: &CellRef) -> String {
        self.cells
            .get(cell_ref)
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.cells.contains_key(cell_ref)
    }

    /// Overwrite a cell unconditionally. Returns the previous content.
    pub fn set(&self, cell_ref: CellRef, value: &str) -> Option<String> {
        if value.is_empty() {
            self.cells.remove(&cell_ref).map(|(_, old)| old)
        } else {
            self.cells.insert(cell_ref, value.to_string())
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every stored cell in row-major order.
    pub fn snapshot(&self) -> BTreeMap<CellRef, String> {
        self.cells
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Replace the whole mapping in one step.
    ///
    /// The new cells are built off to the side and swapped in, so no caller ever sees
    /// a half-written grid.
    pub fn replace_all(&mut self, cells: BTreeMap<CellRef, String>) {
        *self = GridStore::from_cells(cells);
    }
}
