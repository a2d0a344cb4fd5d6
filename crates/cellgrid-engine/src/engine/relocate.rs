//! Rewriting formula references when a formula is copied to another cell.

use regex::Captures;

use super::cell_ref::CellRef;
use super::reference::{RefToken, reference_re};

/// Marker written in place of a reference pushed off the grid.
pub const INVALID_REF: &str = "#REF!";

/// Offset the unmarked axes of every reference by a row/column delta.
///
/// Rules:
/// - `A1` offset by (+2 rows, +1 col) becomes `B3`
/// - `$A1` keeps its column: `$A3`; `A$1` keeps its row: `B$1`
/// - refs that move out of bounds become `#REF!`
pub fn relocate_formula(formula: &str, delta_rows: isize, delta_cols: isize) -> String {
    if delta_rows == 0 && delta_cols == 0 {
        return formula.to_string();
    }

    reference_re()
        .replace_all(formula, |caps: &Captures| {
            let Some(token) = RefToken::parse(&caps[0]) else {
                return caps[0].to_string();
            };
            relocate_token(&token, delta_rows, delta_cols)
                .unwrap_or_else(|| INVALID_REF.to_string())
        })
        .to_string()
}

fn relocate_token(token: &RefToken, delta_rows: isize, delta_cols: isize) -> Option<String> {
    let row = if token.row_absolute {
        token.row?
    } else {
        token.row?.checked_add_signed(delta_rows)?
    };
    let col = if token.col_absolute {
        token.col?
    } else {
        token.col?.checked_add_signed(delta_cols)?
    };

    Some(format!(
        "{}{}{}{}",
        if token.col_absolute { "$" } else { "" },
        CellRef::col_to_letters(col),
        if token.row_absolute { "$" } else { "" },
        row as u128 + 1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_positive_delta() {
        assert_eq!(relocate_formula("=A1+B2*2", 2, 1), "=B3+C4*2");
    }

    #[test]
    fn test_relocate_respects_markers() {
        assert_eq!(
            relocate_formula("=$A1+A$1+$A$1", 1, 1),
            "=$A2+B$1+$A$1"
        );
    }

    #[test]
    fn test_relocate_out_of_bounds() {
        assert_eq!(relocate_formula("=A1+$B2", 0, -1), "=#REF!+$B2");
    }

    #[test]
    fn test_relocate_onto_last_row() {
        // row 2^63 shifted by isize::MAX lands on usize::MAX
        let far = format!("=A{}", (1u128 << 63) + 1);
        assert_eq!(
            relocate_formula(&far, isize::MAX, 0),
            format!("=A{}", usize::MAX as u128 + 1)
        );
    }

    #[test]
    fn test_relocate_zero_delta_is_identity() {
        assert_eq!(relocate_formula("=A0+Z9", 0, 0), "=A0+Z9");
    }
}
