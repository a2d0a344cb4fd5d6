//! Formula engine API.
//!
//! - [`CellRef`] - Cell coordinates (snapshot keys and A1 notation)
//! - [`extract_references`] / [`extract_dependencies`] - Reference parsing
//! - [`evaluate`] - Arithmetic formula evaluation against [`CellValues`]
//! - [`relocate_formula`] - Rewrite references when a formula is copied
//! - [`detect_cycle`] - Circular dependency detection
//! - [`format_number`] - Format values for display

mod cell_ref;
mod cycle;
mod error;
mod eval;
mod format;
mod reference;
mod relocate;

pub use cell_ref::CellRef;
pub use cycle::detect_cycle;
pub use error::EvalError;
pub use eval::{CellValues, Placement, evaluate, evaluate_in_place, parse_number, parse_value_text};
pub use format::{ERROR_SENTINEL, format_number, format_result};
pub use reference::{RefToken, ReferenceMode, extract_dependencies, extract_references};
pub use relocate::{INVALID_REF, relocate_formula};

/// True when raw cell content is a formula.
pub fn is_formula(raw: &str) -> bool {
    raw.starts_with('=')
}
