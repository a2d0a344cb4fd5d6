//! Formula evaluation errors.

use thiserror::Error;

/// Why a formula could not produce a number.
///
/// These never escape the grid boundary: the sheet turns every one of them into the
/// `ERROR` sentinel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("empty formula")]
    Empty,

    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("{cell} is not numeric: {text:?}")]
    NonNumeric { cell: String, text: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("formula nested too deeply")]
    TooDeep,
}
