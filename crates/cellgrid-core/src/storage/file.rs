use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::{
    Snapshot, parse_grd_content, parse_json_content, write_grd_content, write_json_content,
};
use crate::error::Result;

/// Somewhere a snapshot can be saved to and loaded from.
pub trait SnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileFormat {
    Json,
    Grd,
}

impl FileFormat {
    /// `.grd` selects the text format; anything else is JSON.
    pub fn from_path(path: &Path) -> FileFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("grd") => FileFormat::Grd,
            _ => FileFormat::Json,
        }
    }
}

/// A snapshot kept in a single file.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
    format: FileFormat,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path);
        FileSnapshotStore { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let content = match self.format {
            FileFormat::Json => write_json_content(snapshot)?,
            FileFormat::Grd => write_grd_content(snapshot),
        };
        fs::write(&self.path, content)?;
        info!("saved {} cells to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = match self.format {
            FileFormat::Json => parse_json_content(&content)?,
            FileFormat::Grd => parse_grd_content(&content)?,
        };
        info!("loaded {} cells from {}", snapshot.len(), self.path.display());
        Ok(Some(snapshot))
    }
}
