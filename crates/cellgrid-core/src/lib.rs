//! cellgrid-core - UI-agnostic sheet model, recalculation and snapshot storage.

pub mod aggregate;
pub mod deps;
pub mod dims;
pub mod error;
pub mod options;
pub mod selection;
pub mod sheet;
pub mod storage;
pub mod store;
pub mod transform;

pub use aggregate::Aggregate;
pub use dims::Dimensions;
pub use error::{GridError, Result};
pub use options::{RecalcMode, SheetOptions};
pub use selection::{DragPayload, FillPlan, Gesture, Selection};
pub use sheet::{RecalcReport, Sheet};
pub use storage::{FileFormat, FileSnapshotStore, Snapshot, SnapshotStore};
pub use transform::{ReplaceMode, Transform};

pub use cellgrid_engine::engine::{CellRef, ReferenceMode};
