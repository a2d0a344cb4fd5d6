//! Visible grid size.

use cellgrid_engine::engine::CellRef;

/// Number of visible rows and columns. Never below one of each.
///
/// Shrinking hides cells; stored content outside the bounds is kept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Self {
        Dimensions {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn add_row(&mut self) {
        self.rows += 1;
    }

    pub fn remove_row(&mut self) {
        if self.rows > 1 {
            self.rows -= 1;
        }
    }

    pub fn add_col(&mut self) {
        self.cols += 1;
    }

    pub fn remove_col(&mut self) {
        if self.cols > 1 {
            self.cols -= 1;
        }
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }

    /// Column header labels, `A`, `B`, ...
    pub fn column_labels(&self) -> Vec<String> {
        (0..self.cols).map(CellRef::col_to_letters).collect()
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions::new(20, 10)
    }
}
