//! Reference token extraction and resolution.
//!
//! Matching is purely lexical: any run of uppercase letters followed by digits is a
//! reference, optionally with `$` before the letters and/or the digits. Nothing here
//! checks whether the referenced cell holds anything.

use regex::{Captures, Regex};
use serde::Deserialize;
use std::ops::Range;
use std::sync::OnceLock;

use super::cell_ref::{CellRef, letters_to_col};

/// How unmarked (relative) reference axes are resolved during evaluation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// Unmarked axes shift by the relocation delta; in place they name the written cell.
    #[default]
    Literal,
    /// Legacy behaviour: with any `$` in the formula every reference is read as written,
    /// otherwise every reference resolves to the destination cell itself, which
    /// evaluation reads as the formula's own text.
    Legacy,
}

/// One reference token found in a formula.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefToken {
    /// Byte range of the token in the scanned text.
    pub span: Range<usize>,
    /// Zero-based column, None if the letters overflow.
    pub col: Option<usize>,
    /// Zero-based row, None for row label 0 or overflow.
    pub row: Option<usize>,
    pub col_absolute: bool,
    pub row_absolute: bool,
}

impl RefToken {
    fn from_captures(caps: &Captures) -> RefToken {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        RefToken {
            span: whole,
            col: letters_to_col(&caps[2]),
            row: caps[4]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1)),
            col_absolute: !caps[1].is_empty(),
            row_absolute: !caps[3].is_empty(),
        }
    }

    /// Parse a single token such as `B7`, `$B7`, `B$7` or `$B$7`.
    pub fn parse(text: &str) -> Option<RefToken> {
        let caps = reference_re().captures(text)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != text.len() {
            return None;
        }
        Some(RefToken::from_captures(&caps))
    }

    /// The cell exactly as written, ignoring `$` markers.
    pub fn written(&self) -> Option<CellRef> {
        Some(CellRef::new(self.row?, self.col?))
    }

    /// Resolve for a formula authored at `origin` and evaluated at `dest`.
    ///
    /// Marked axes keep their written index, unmarked axes move by `dest - origin`.
    pub fn relocated(&self, origin: &CellRef, dest: &CellRef) -> Option<CellRef> {
        let row = if self.row_absolute {
            self.row?
        } else {
            shift(self.row?, origin.row, dest.row)?
        };
        let col = if self.col_absolute {
            self.col?
        } else {
            shift(self.col?, origin.col, dest.col)?
        };
        Some(CellRef::new(row, col))
    }

    /// Resolve according to `mode`. `formula_has_marker` is whether the whole
    /// formula text contains a `$` (only consulted by [`ReferenceMode::Legacy`]).
    pub fn resolve(
        &self,
        mode: ReferenceMode,
        formula_has_marker: bool,
        origin: &CellRef,
        dest: &CellRef,
    ) -> Option<CellRef> {
        match mode {
            ReferenceMode::Literal => self.relocated(origin, dest),
            ReferenceMode::Legacy if formula_has_marker => self.written(),
            ReferenceMode::Legacy => Some(dest.clone()),
        }
    }
}

fn shift(written: usize, origin: usize, dest: usize) -> Option<usize> {
    let delta = dest as isize - origin as isize;
    written.checked_add_signed(delta)
}

/// Regex matching one reference token; groups are `$`, letters, `$`, digits.
pub fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\$?)([A-Z]+)(\$?)([0-9]+)").expect("reference regex must compile")
    })
}

/// Extract all reference tokens from an expression, in textual order.
pub fn extract_references(expression: &str) -> Vec<RefToken> {
    reference_re()
        .captures_iter(expression)
        .map(|caps| RefToken::from_captures(&caps))
        .collect()
}

/// The cells an expression names as written, in textual order.
/// Tokens that do not denote a cell on the grid (e.g. `A0`) are skipped.
pub fn extract_dependencies(expression: &str) -> Vec<CellRef> {
    extract_references(expression)
        .iter()
        .filter_map(RefToken::written)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_markers() {
        let refs = extract_references("$A1+B$2*$C$3-D4");
        assert_eq!(refs.len(), 4);
        assert!(refs[0].col_absolute && !refs[0].row_absolute);
        assert!(!refs[1].col_absolute && refs[1].row_absolute);
        assert!(refs[2].col_absolute && refs[2].row_absolute);
        assert!(!refs[3].col_absolute && !refs[3].row_absolute);
        assert_eq!(refs[2].written(), Some(CellRef::new(2, 2)));
    }

    #[test]
    fn test_extract_is_lexical() {
        let refs = extract_references("ZZ999 + A0 + b2");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].written(), Some(CellRef::new(998, 701)));
        assert_eq!(refs[1].written(), None);
        assert_eq!(extract_dependencies("ZZ999 + A0"), vec![CellRef::new(998, 701)]);
    }

    #[test]
    fn test_spans_cover_tokens() {
        let text = "1+$AB$10";
        let refs = extract_references(text);
        assert_eq!(&text[refs[0].span.clone()], "$AB$10");
    }

    #[test]
    fn test_relocated_shifts_unmarked_axes() {
        let origin = CellRef::new(0, 1); // B1
        let dest = CellRef::new(2, 3); // D3
        let rel = RefToken::parse("A1").unwrap();
        assert_eq!(rel.relocated(&origin, &dest), Some(CellRef::new(2, 2)));
        let col_fixed = RefToken::parse("$A1").unwrap();
        assert_eq!(col_fixed.relocated(&origin, &dest), Some(CellRef::new(2, 0)));
        let row_fixed = RefToken::parse("A$1").unwrap();
        assert_eq!(row_fixed.relocated(&origin, &dest), Some(CellRef::new(0, 2)));
        let fixed = RefToken::parse("$A$1").unwrap();
        assert_eq!(fixed.relocated(&origin, &dest), Some(CellRef::new(0, 0)));
    }

    #[test]
    fn test_relocated_in_place_is_written_cell() {
        let here = CellRef::new(4, 4);
        let token = RefToken::parse("B2").unwrap();
        assert_eq!(token.relocated(&here, &here), Some(CellRef::new(1, 1)));
    }

    #[test]
    fn test_relocated_off_grid() {
        let token = RefToken::parse("A1").unwrap();
        assert_eq!(
            token.relocated(&CellRef::new(3, 3), &CellRef::new(0, 0)),
            None
        );
    }

    #[test]
    fn test_legacy_mode_collapses_to_destination() {
        let here = CellRef::new(4, 4);
        let token = RefToken::parse("B2").unwrap();
        assert_eq!(
            token.resolve(ReferenceMode::Legacy, false, &here, &here),
            Some(here.clone())
        );
        assert_eq!(
            token.resolve(ReferenceMode::Legacy, true, &here, &here),
            Some(CellRef::new(1, 1))
        );
    }

    #[test]
    fn test_parse_rejects_partial_tokens() {
        assert!(RefToken::parse("A1+").is_none());
        assert!(RefToken::parse("a1").is_none());
        assert!(RefToken::parse("$$A1").is_none());
    }
}
