use cellgrid_engine::engine::{CellRef, CellValues, is_formula};
use dashmap::DashMap;

use crate::deps::DependencyTracker;
use crate::dims::Dimensions;
use crate::options::SheetOptions;
use crate::selection::Selection;
use crate::store::GridStore;

/// An owned spreadsheet: raw content, computed values and the interaction state
/// around them.
pub struct Sheet {
    /// Raw cell content. Formulas stay here as written.
    pub(crate) store: GridStore,
    /// Direct references of every formula cell.
    pub(crate) deps: DependencyTracker,
    /// Display text of the last evaluation of each formula cell.
    pub(crate) values: DashMap<CellRef, String>,
    pub(crate) selection: Selection,
    pub(crate) dims: Dimensions,
    pub(crate) options: SheetOptions,
    /// Whether content changed since the last save or load.
    pub(crate) modified: bool,
}

impl Sheet {
    pub fn new() -> Self {
        Self::with_options(SheetOptions::default())
    }

    pub fn with_options(options: SheetOptions) -> Self {
        Sheet {
            store: GridStore::new(),
            deps: DependencyTracker::new(),
            values: DashMap::new(),
            selection: Selection::new(),
            dims: Dimensions::new(options.rows, options.cols),
            options,
            modified: false,
        }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Raw content of a cell; empty string when absent.
    pub fn get_raw(&self, cell_ref: &CellRef) -> String {
        self.store.get(cell_ref)
    }

    /// What a cell shows: the computed value for a formula, the raw content otherwise.
    pub fn display(&self, cell_ref: &CellRef) -> String {
        let raw = self.store.get(cell_ref);
        if !is_formula(&raw) {
            return raw;
        }
        match self.values.get(cell_ref) {
            Some(value) => value.clone(),
            None => self.evaluate_cell(cell_ref, &raw),
        }
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn dependents_of(&self, cell_ref: &CellRef) -> Vec<CellRef> {
        self.deps.dependents_of(cell_ref)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn dimensions_mut(&mut self) -> &mut Dimensions {
        &mut self.dims
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

/// What formulas read: plain content as stored, formula cells through their last
/// computed value. A formula that has not been evaluated yet reads as empty.
impl CellValues for Sheet {
    fn value_text(&self, cell_ref: &CellRef) -> Option<String> {
        let raw = self.store.get(cell_ref);
        if raw.is_empty() {
            return None;
        }
        if is_formula(&raw) {
            return self.values.get(cell_ref).map(|v| v.clone());
        }
        Some(raw)
    }
}
