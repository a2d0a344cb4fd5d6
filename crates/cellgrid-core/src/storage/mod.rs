//! Snapshot persistence.

mod file;
mod grd;
mod json;
mod snapshot;

pub use file::{FileFormat, FileSnapshotStore, SnapshotStore};
pub use grd::{parse_grd_content, write_grd_content};
pub use json::{parse_json_content, parse_rows_json, write_json_content, write_rows_json};
pub use snapshot::Snapshot;
