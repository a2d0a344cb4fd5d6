use log::info;

use super::{RecalcReport, Sheet};
use crate::error::Result;
use crate::storage::{Snapshot, SnapshotStore, write_rows_json};

impl Sheet {
    /// Raw content of every non-empty cell.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_cells(self.store.snapshot())
    }

    /// Row arrays bounded by the current dimensions.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.snapshot().to_rows(self.dims.rows(), self.dims.cols())
    }

    /// [`Sheet::rows`] encoded as JSON.
    pub fn rows_json(&self) -> Result<String> {
        write_rows_json(&self.snapshot(), self.dims.rows(), self.dims.cols())
    }

    /// Replace the whole grid with `snapshot` and recompute every formula.
    /// Selection and any drag in progress are reset.
    pub fn restore(&mut self, snapshot: Snapshot) -> RecalcReport {
        let cells = snapshot.into_cells();
        self.deps.rebuild(&cells);
        self.store.replace_all(cells);
        self.selection.clear();
        self.recompute_all()
    }

    pub fn save(&mut self, store: &dyn SnapshotStore) -> Result<()> {
        store.save(&self.snapshot())?;
        self.modified = false;
        Ok(())
    }

    /// Load from `store`. Returns false, leaving the sheet as it was, when the
    /// store holds nothing yet.
    pub fn load(&mut self, store: &dyn SnapshotStore) -> Result<bool> {
        let Some(snapshot) = store.load()? else {
            return Ok(false);
        };
        let report = self.restore(snapshot);
        if !report.errors.is_empty() {
            info!("{} formulas evaluate to ERROR after load", report.errors.len());
        }
        self.modified = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::storage::{parse_json_content, write_grd_content};
    use cellgrid_engine::engine::CellRef;
    use std::cell::RefCell;

    /// In-memory store for exercising the save/load paths.
    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Option<Snapshot>>,
        fail: bool,
    }

    impl SnapshotStore for MemoryStore {
        fn save(&self, snapshot: &Snapshot) -> Result<()> {
            if self.fail {
                return Err(GridError::Io(std::io::Error::other("offline")));
            }
            *self.saved.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }

        fn load(&self) -> Result<Option<Snapshot>> {
            Ok(self.saved.borrow().clone())
        }
    }

    fn a1(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::default();
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "5");
        sheet.set_cell(a1("B1"), "=A1*2");
        sheet.save(&store).unwrap();
        assert!(!sheet.is_modified());

        let mut other = Sheet::new();
        assert!(other.load(&store).unwrap());
        assert_eq!(other.get_raw(&a1("B1")), "=A1*2");
        assert_eq!(other.display(&a1("B1")), "10");
        assert_eq!(other.dependents_of(&a1("A1")), vec![a1("B1")]);
    }

    #[test]
    fn test_load_nothing_keeps_sheet() {
        let store = MemoryStore::default();
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "keep");
        assert!(!sheet.load(&store).unwrap());
        assert_eq!(sheet.get_raw(&a1("A1")), "keep");
    }

    #[test]
    fn test_failed_save_keeps_modified() {
        let store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "1");
        assert!(sheet.save(&store).is_err());
        assert!(sheet.is_modified());
        sheet.set_cell(a1("A2"), "still editable");
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_restore_resets_selection_and_values() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "=1+1");
        sheet.press(a1("A1"));
        sheet.drag_start(a1("A1"));

        let mut snap = Snapshot::new();
        snap.insert(a1("C1"), "=A1+3");
        let report = sheet.restore(snap);

        assert_eq!(report.recomputed, vec![a1("C1")]);
        assert_eq!(sheet.display(&a1("C1")), "3");
        assert_eq!(sheet.get_raw(&a1("A1")), "");
        assert!(sheet.focused().is_none());
        assert!(sheet.drop_on(a1("D1")).is_none());
    }

    #[test]
    fn test_restore_coordinates_at_the_usize_limit() {
        let content = format!(r#"{{"0-{max}": "x", "{max}-0": "y"}}"#, max = usize::MAX);
        let mut sheet = Sheet::new();
        sheet.restore(parse_json_content(&content).unwrap());

        let names: Vec<String> = sheet
            .snapshot()
            .iter()
            .map(|(cell_ref, _)| cell_ref.to_string())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&format!("A{}", usize::MAX as u128 + 1)));
        let text = write_grd_content(&sheet.snapshot());
        assert!(text.contains("\"x\""));
        assert!(text.contains("\"y\""));
    }

    #[test]
    fn test_rows_follow_dimensions() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("B1"), "x");
        sheet.set_cell(a1("A30"), "outside");
        let rows = sheet.rows();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].len(), 10);
        assert_eq!(rows[0][1], "x");

        sheet.dimensions_mut().remove_col();
        assert_eq!(sheet.rows()[0].len(), 9);

        let json = sheet.rows_json().unwrap();
        assert!(json.starts_with(r#"[["","x","#));
        let back = parse_json_content(&json).unwrap();
        assert_eq!(back.get(&a1("B1")), Some("x"));
        assert_eq!(back.get(&a1("A30")), None);
    }
}
