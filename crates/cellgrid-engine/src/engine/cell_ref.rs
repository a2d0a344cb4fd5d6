//! Cell coordinates and their presentation forms.
//!
//! A [`CellRef`] is a zero-indexed (row, column) pair. Two textual forms exist:
//!
//! - the composite key `"{row}-{col}"` used by snapshots (`"2-1"`)
//! - A1 notation shown to users (`"B3"`), one-based rows and lettered columns
//!
//! # Examples
//!
//! ```ignore
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.row, 2);  // 0-indexed
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.to_string(), "B3");
//! assert_eq!(cell.key(), "2-1");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by row and column indices (0-indexed).
///
/// Ordering is row-major: all of row 0, then row 1, and so on.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "B2", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let col = letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(row, col))
    }

    /// Composite snapshot key, `"{row}-{col}"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.row, self.col)
    }

    /// Parse a composite snapshot key produced by [`CellRef::key`].
    pub fn from_key(key: &str) -> Option<CellRef> {
        let (row, col) = key.split_once('-')?;
        Some(CellRef::new(row.parse().ok()?, col.parse().ok()?))
    }

    /// Move by a signed row/column delta. None when the result leaves the grid.
    pub fn offset(&self, delta_rows: isize, delta_cols: isize) -> Option<CellRef> {
        Some(CellRef::new(
            self.row.checked_add_signed(delta_rows)?,
            self.col.checked_add_signed(delta_cols)?,
        ))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

/// Decode base-26 column letters (A -> 0, Z -> 25, AA -> 26).
pub(crate) fn letters_to_col(letters: &str) -> Option<usize> {
    let mut acc = 0usize;
    for c in letters.to_ascii_uppercase().bytes() {
        let digit = (c - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("A1 regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row as u128 + 1)
    }
}
