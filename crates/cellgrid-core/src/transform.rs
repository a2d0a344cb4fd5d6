//! Whole-grid text transforms.
//!
//! Every transform maps the complete cell mapping to a new one; the sheet swaps the
//! result in at once.

use cellgrid_engine::engine::CellRef;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use crate::error::{GridError, Result};

/// How the search term of a replace is interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReplaceMode {
    /// Plain substring.
    #[default]
    Literal,
    /// Regular expression; the replacement may use `$1`-style group references.
    Pattern,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transform {
    Trim,
    Upper,
    Lower,
    /// Replace every occurrence of `search` in every cell.
    Replace {
        search: String,
        replacement: String,
        mode: ReplaceMode,
    },
    /// Keep the first cell (row-major) holding each distinct value, clear the rest.
    Dedupe,
}

impl Transform {
    pub fn replace(search: &str, replacement: &str, mode: ReplaceMode) -> Transform {
        Transform::Replace {
            search: search.to_string(),
            replacement: replacement.to_string(),
            mode,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Trim => "trim",
            Transform::Upper => "upper",
            Transform::Lower => "lower",
            Transform::Replace { .. } => "replace",
            Transform::Dedupe => "dedupe",
        }
    }

    /// Compute the transformed mapping. Cells whose content becomes empty are dropped.
    ///
    /// Fails before producing anything when the search term is empty or the pattern
    /// does not compile.
    pub fn apply(&self, cells: &BTreeMap<CellRef, String>) -> Result<BTreeMap<CellRef, String>> {
        let out = match self {
            Transform::Trim => map_values(cells, |v| v.trim().to_string()),
            Transform::Upper => map_values(cells, str::to_uppercase),
            Transform::Lower => map_values(cells, str::to_lowercase),
            Transform::Replace {
                search,
                replacement,
                mode,
            } => {
                if search.is_empty() {
                    return Err(GridError::EmptySearch);
                }
                match mode {
                    ReplaceMode::Literal => {
                        map_values(cells, |v| v.replace(search.as_str(), replacement))
                    }
                    ReplaceMode::Pattern => {
                        let re = Regex::new(search)?;
                        map_values(cells, |v| re.replace_all(v, replacement.as_str()).into_owned())
                    }
                }
            }
            Transform::Dedupe => {
                let mut seen: HashSet<&str> = HashSet::new();
                cells
                    .iter()
                    .filter(|&(_, v)| seen.insert(v.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            }
        };
        Ok(out)
    }
}

fn map_values<F>(cells: &BTreeMap<CellRef, String>, f: F) -> BTreeMap<CellRef, String>
where
    F: Fn(&str) -> String,
{
    cells
        .iter()
        .map(|(k, v)| (k.clone(), f(v)))
        .filter(|(_, v)| !v.is_empty())
        .collect()
}
