//! Behaviour switches for a [`Sheet`](crate::Sheet).

use cellgrid_engine::engine::ReferenceMode;
use serde::Deserialize;

/// How far an edit propagates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalcMode {
    /// Re-evaluate the direct dependents of the edited cell only.
    #[default]
    Direct,
    /// Re-evaluate everything downstream of the edited cell in dependency order.
    /// Cells on or behind a reference cycle become `ERROR`.
    Transitive,
}

/// Sheet configuration. Every field has a default, so partial config files work.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    pub reference_mode: ReferenceMode,
    pub recalc_mode: RecalcMode,
    /// Relocate formula references when fill or drag-and-drop copies a formula.
    pub relocate_on_copy: bool,
    pub rows: usize,
    pub cols: usize,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            reference_mode: ReferenceMode::Literal,
            recalc_mode: RecalcMode::Direct,
            relocate_on_copy: false,
            rows: 20,
            cols: 10,
        }
    }
}
