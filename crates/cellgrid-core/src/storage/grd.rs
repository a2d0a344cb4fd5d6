//! Line-oriented `.grd` text format.
//!
//! ```text
//! # cellgrid sheet
//! A1: 5
//! B1: =A1+1
//! C1: "some text"
//! ```
//!
//! Numbers and formulas are written bare; everything else is quoted with `\\`, `\"`
//! and `\n` escapes so that any raw content survives a round trip.

use cellgrid_engine::engine::{CellRef, is_formula};

use super::Snapshot;
use crate::error::{GridError, Result};

const HEADER: &str = "# cellgrid sheet";

pub fn parse_grd_content(content: &str) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((cell_ref_str, value_str)) = line.split_once(':') else {
            return Err(GridError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: VALUE' format".to_string(),
            });
        };

        let cell_ref_str = cell_ref_str.trim();
        let cell_ref = CellRef::from_str(cell_ref_str).ok_or_else(|| GridError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", cell_ref_str),
        })?;

        let raw = parse_value(value_str.trim(), line_num + 1)?;
        snapshot.insert(cell_ref, &raw);
    }

    Ok(snapshot)
}

fn parse_value(value: &str, line_num: usize) -> Result<String> {
    if value.is_empty() || is_formula(value) {
        return Ok(value.to_string());
    }

    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Ok(unescape(&value[1..value.len() - 1]));
    }

    if value.parse::<f64>().is_ok() {
        return Ok(value.to_string());
    }

    Err(GridError::Parse {
        line: line_num,
        message: format!("Invalid value: {}. Use quotes for text.", value),
    })
}

pub fn write_grd_content(snapshot: &Snapshot) -> String {
    let mut lines = vec![HEADER.to_string()];
    for (cell_ref, raw) in snapshot.iter() {
        lines.push(format!("{}: {}", cell_ref, encode_value(raw)));
    }
    lines.join("\n") + "\n"
}

fn encode_value(raw: &str) -> String {
    let bare = raw.trim() == raw && !raw.contains('\n');
    if bare && (is_formula(raw) || raw.parse::<f64>().is_ok()) {
        raw.to_string()
    } else {
        format!("\"{}\"", escape(raw))
    }
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_content() {
        let content = "# comment\n\nA1: 42\nB1: =A1*2\nc2: \"He said \\\"hi\\\"\"\n";
        let snap = parse_grd_content(content).unwrap();
        assert_eq!(snap.get(&CellRef::new(0, 0)), Some("42"));
        assert_eq!(snap.get(&CellRef::new(0, 1)), Some("=A1*2"));
        assert_eq!(snap.get(&CellRef::new(1, 2)), Some("He said \"hi\""));
    }

    #[test]
    fn test_parse_errors_carry_line() {
        match parse_grd_content("A1: 1\nnot a line") {
            Err(GridError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {:?}", other),
        }
        match parse_grd_content("A1: bare text") {
            Err(GridError::Parse { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("Use quotes"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(parse_grd_content("1A: 3").is_err());
    }

    #[test]
    fn test_write_sorted_with_header() {
        let mut snap = Snapshot::new();
        snap.insert(CellRef::new(1, 1), "3");
        snap.insert(CellRef::new(0, 0), "=B2+1");
        snap.insert(CellRef::new(0, 1), "text");

        let content = write_grd_content(&snap);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![HEADER, "A1: =B2+1", "B1: \"text\"", "B2: 3"]
        );
    }

    #[test]
    fn test_awkward_raw_content_survives() {
        let mut snap = Snapshot::new();
        for (col, raw) in ["  padded ", "line\nbreak", "back\\slash", "=A1 ", "007x"]
            .iter()
            .enumerate()
        {
            snap.insert(CellRef::new(0, col), raw);
        }
        let back = parse_grd_content(&write_grd_content(&snap)).unwrap();
        assert_eq!(back, snap);
    }
}
