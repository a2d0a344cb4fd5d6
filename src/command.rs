//! Shell commands run with `-e/--exec`.

use cellgrid_core::{Aggregate, CellRef, ReplaceMode, Sheet, Transform};
use cellgrid_engine::engine::format_number;
use std::str::FromStr;

use crate::error::{CommandError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `set A1 <raw...>`: everything after the cell is the raw content.
    Set(CellRef, String),
    Get(CellRef),
    Show,
    Aggregate(Aggregate),
    Transform(Transform),
    /// `fill A1 A2 ...`: press the first cell, enter the rest, release.
    Fill(Vec<CellRef>),
    Drag(CellRef, CellRef),
    Resize(Axis, bool),
    Recalc,
}

fn parse_cell(token: Option<&str>, usage: &'static str) -> Result<CellRef> {
    let token = token.ok_or(CommandError::Usage(usage))?;
    CellRef::from_str(token).ok_or_else(|| CommandError::InvalidCell(token.to_string()))
}

fn parse_replace(args: &[&str], mode: ReplaceMode, usage: &'static str) -> Result<Command> {
    match args {
        [search] => Ok(Command::Transform(Transform::replace(search, "", mode))),
        [search, replacement] => Ok(Command::Transform(Transform::replace(
            search,
            replacement,
            mode,
        ))),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_resize(axis: Axis, args: &[&str], usage: &'static str) -> Result<Command> {
    match args {
        ["+"] => Ok(Command::Resize(axis, true)),
        ["-"] => Ok(Command::Resize(axis, false)),
        _ => Err(CommandError::Usage(usage)),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Command> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "set" => {
                const USAGE: &str = "set <CELL> <CONTENT>";
                let (cell, raw) = match rest.split_once(char::is_whitespace) {
                    Some((cell, raw)) => (cell, raw),
                    None => (rest, ""),
                };
                if cell.is_empty() {
                    return Err(CommandError::Usage(USAGE));
                }
                Ok(Command::Set(parse_cell(Some(cell), USAGE)?, raw.to_string()))
            }
            "get" => Ok(Command::Get(parse_cell(args.first().copied(), "get <CELL>")?)),
            "show" => Ok(Command::Show),
            "agg" => {
                let kind = args.first().ok_or(CommandError::Usage("agg <KIND>"))?;
                Ok(Command::Aggregate(kind.parse()?))
            }
            "trim" => Ok(Command::Transform(Transform::Trim)),
            "upper" => Ok(Command::Transform(Transform::Upper)),
            "lower" => Ok(Command::Transform(Transform::Lower)),
            "dedupe" => Ok(Command::Transform(Transform::Dedupe)),
            "replace" => parse_replace(&args, ReplaceMode::Literal, "replace <FIND> [WITH]"),
            "replace-re" => {
                parse_replace(&args, ReplaceMode::Pattern, "replace-re <PATTERN> [WITH]")
            }
            "fill" => {
                const USAGE: &str = "fill <CELL> <CELL>...";
                if args.is_empty() {
                    return Err(CommandError::Usage(USAGE));
                }
                let cells = args
                    .iter()
                    .map(|a| parse_cell(Some(*a), USAGE))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Command::Fill(cells))
            }
            "drag" => {
                const USAGE: &str = "drag <FROM> <TO>";
                if args.len() != 2 {
                    return Err(CommandError::Usage(USAGE));
                }
                Ok(Command::Drag(
                    parse_cell(Some(args[0]), USAGE)?,
                    parse_cell(Some(args[1]), USAGE)?,
                ))
            }
            "rows" => parse_resize(Axis::Rows, &args, "rows +|-"),
            "cols" => parse_resize(Axis::Cols, &args, "cols +|-"),
            "recalc" => Ok(Command::Recalc),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    /// Run against `sheet` and return the text to print (possibly empty).
    pub fn execute(&self, sheet: &mut Sheet) -> Result<String> {
        let out = match self {
            Command::Set(cell_ref, raw) => {
                let report = sheet.set_cell(cell_ref.clone(), raw);
                if report.recomputed.is_empty() {
                    String::new()
                } else {
                    format!("{} formulas recomputed", report.recomputed.len())
                }
            }
            Command::Get(cell_ref) => sheet.display(cell_ref),
            Command::Show => sheet
                .snapshot()
                .iter()
                .map(|(cell_ref, _)| format!("{}\t{}", cell_ref, sheet.display(cell_ref)))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Aggregate(kind) => match sheet.aggregate(*kind) {
                Some(n) => format!("{}: {}", kind, format_number(n)),
                None => format!("{}: n/a", kind),
            },
            Command::Transform(transform) => {
                let changed = sheet.apply_transform(transform)?;
                format!("{}: {} cells changed", transform.name(), changed)
            }
            Command::Fill(cells) => {
                let mut iter = cells.iter().cloned();
                if let Some(first) = iter.next() {
                    sheet.press(first);
                }
                for cell_ref in iter {
                    sheet.enter(cell_ref);
                }
                let report = sheet.release();
                format!("filled {} cells", cells.len().saturating_sub(1))
                    + &recomputed_suffix(report.recomputed.len())
            }
            Command::Drag(from, to) => {
                sheet.drag_start(from.clone());
                match sheet.drop_on(to.clone()) {
                    Some(_) => format!("copied {} to {}", from, to),
                    None => String::new(),
                }
            }
            Command::Resize(axis, grow) => {
                let dims = sheet.dimensions_mut();
                match (*axis, *grow) {
                    (Axis::Rows, true) => dims.add_row(),
                    (Axis::Rows, false) => dims.remove_row(),
                    (Axis::Cols, true) => dims.add_col(),
                    (Axis::Cols, false) => dims.remove_col(),
                }
                format!("{} rows x {} cols", dims.rows(), dims.cols())
            }
            Command::Recalc => {
                let report = sheet.recompute_all();
                format!("{} formulas recomputed", report.recomputed.len())
            }
        };
        Ok(out)
    }
}

fn recomputed_suffix(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!(", {} formulas recomputed", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a1(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn run(sheet: &mut Sheet, line: &str) -> String {
        line.parse::<Command>().unwrap().execute(sheet).unwrap()
    }

    #[test]
    fn test_parse_set_keeps_content_verbatim() {
        let cmd: Command = "set b2 =A1 +  1".parse().unwrap();
        assert_eq!(cmd, Command::Set(a1("B2"), "=A1 +  1".to_string()));
        let cmd: Command = "set A1".parse().unwrap();
        assert_eq!(cmd, Command::Set(a1("A1"), String::new()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<Command>(), Err(CommandError::Empty)));
        assert!(matches!(
            "frobnicate".parse::<Command>(),
            Err(CommandError::Unknown(_))
        ));
        assert!(matches!(
            "get 1A".parse::<Command>(),
            Err(CommandError::InvalidCell(_))
        ));
        assert!(matches!("drag A1".parse::<Command>(), Err(CommandError::Usage(_))));
        assert!(matches!("rows 3".parse::<Command>(), Err(CommandError::Usage(_))));
        assert!(matches!(
            "agg median".parse::<Command>(),
            Err(CommandError::Grid(_))
        ));
    }

    #[test]
    fn test_execute_session() {
        let mut sheet = Sheet::new();
        run(&mut sheet, "set A1 5");
        run(&mut sheet, "set B1 =A1+1");
        assert_eq!(run(&mut sheet, "set A1 6"), "1 formulas recomputed");
        assert_eq!(run(&mut sheet, "get B1"), "7");
        assert_eq!(run(&mut sheet, "show"), "A1\t6\nB1\t7");
        assert_eq!(run(&mut sheet, "agg sum"), "SUM: 13");
    }

    #[test]
    fn test_execute_fill_and_drag() {
        let mut sheet = Sheet::new();
        run(&mut sheet, "set A3 x");
        assert_eq!(run(&mut sheet, "fill A1 A2 A3"), "filled 2 cells");
        assert_eq!(sheet.get_raw(&a1("A1")), "x");
        assert_eq!(run(&mut sheet, "drag A1 C1"), "copied A1 to C1");
        assert_eq!(sheet.get_raw(&a1("C1")), "x");
    }

    #[test]
    fn test_execute_transforms_and_resize() {
        let mut sheet = Sheet::new();
        run(&mut sheet, "set A1 banana");
        assert_eq!(run(&mut sheet, "replace a b"), "replace: 1 cells changed");
        assert_eq!(sheet.get_raw(&a1("A1")), "bbnbnb");
        assert_eq!(run(&mut sheet, "replace-re b+"), "replace: 1 cells changed");
        assert_eq!(sheet.get_raw(&a1("A1")), "nn");
        assert!("replace-re (".parse::<Command>().unwrap().execute(&mut sheet).is_err());

        assert_eq!(run(&mut sheet, "rows +"), "21 rows x 10 cols");
        assert_eq!(run(&mut sheet, "cols -"), "21 rows x 9 cols");
    }

    #[test]
    fn test_aggregate_of_nothing() {
        let mut sheet = Sheet::new();
        assert_eq!(run(&mut sheet, "agg max"), "MAX: n/a");
        assert_eq!(run(&mut sheet, "agg avg"), "AVERAGE: 0");
    }
}
