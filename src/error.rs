//! Error types for the cellgrid shell.

use cellgrid_core::GridError;
use thiserror::Error;

/// Errors from parsing or running a shell command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type Result<T> = std::result::Result<T, CommandError>;
