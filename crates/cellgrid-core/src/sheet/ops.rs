use cellgrid_engine::engine::{
    CellRef, EvalError, Placement, evaluate, is_formula, parse_number, relocate_formula,
};
use log::{debug, info};

use super::{RecalcReport, Sheet};
use crate::aggregate::Aggregate;
use crate::error::Result;
use crate::transform::Transform;

impl Sheet {
    /// Store raw content in a cell and recalculate.
    ///
    /// A formula is recorded and evaluated in its own cell first; then the cells that
    /// read this one are recomputed according to the recalculation mode.
    pub fn set_cell(&mut self, cell_ref: CellRef, raw: &str) -> RecalcReport {
        self.store.set(cell_ref.clone(), raw);
        self.values.remove(&cell_ref);
        self.modified = true;

        let mut report = RecalcReport::default();
        if is_formula(raw) {
            self.deps.record(&cell_ref, raw);
            self.recompute_edited(&cell_ref, &mut report);
        } else {
            self.deps.remove(&cell_ref);
        }
        self.propagate(&cell_ref, &mut report);
        report
    }

    pub fn clear_cell(&mut self, cell_ref: &CellRef) -> RecalcReport {
        self.set_cell(cell_ref.clone(), "")
    }

    /// Evaluate a formula as if it were written in `at`, without storing it.
    pub fn evaluate_at(&self, formula: &str, at: &CellRef) -> std::result::Result<f64, EvalError> {
        evaluate(
            formula,
            &Placement::in_place(at),
            self.options.reference_mode,
            self,
        )
    }

    /// Reduce every cell whose displayed content is a finite number.
    pub fn aggregate(&self, kind: Aggregate) -> Option<f64> {
        let numbers: Vec<f64> = self
            .store
            .snapshot()
            .keys()
            .filter_map(|cell_ref| parse_number(&self.display(cell_ref)))
            .collect();
        kind.compute(numbers)
    }

    /// Apply a bulk transform to the raw content of every cell in one step.
    /// Returns the number of cells whose content changed.
    ///
    /// Dependents are not recomputed; only formulas whose own text changed are
    /// re-evaluated.
    pub fn apply_transform(&mut self, transform: &Transform) -> Result<usize> {
        let before = self.store.snapshot();
        let after = transform.apply(&before)?;

        let mut changed: Vec<CellRef> = before
            .iter()
            .filter(|(cell_ref, raw)| after.get(*cell_ref) != Some(*raw))
            .map(|(cell_ref, _)| cell_ref.clone())
            .chain(
                after
                    .keys()
                    .filter(|cell_ref| !before.contains_key(*cell_ref))
                    .cloned(),
            )
            .collect();
        changed.sort();

        if changed.is_empty() {
            debug!("{}: no cells changed", transform.name());
            return Ok(0);
        }

        self.deps.rebuild(&after);
        self.store.replace_all(after);
        for cell_ref in &changed {
            self.values.remove(cell_ref);
        }
        let formulas: Vec<CellRef> = changed
            .iter()
            .filter(|cell_ref| self.deps.is_tracked(cell_ref))
            .cloned()
            .collect();
        let mut report = RecalcReport::default();
        self.recompute_ordered(formulas, &mut report);

        self.modified = true;
        info!("{} changed {} cells", transform.name(), changed.len());
        Ok(changed.len())
    }

    /// Content written to `target` when copying `raw` out of `source`.
    fn copied_content(&self, raw: &str, source: &CellRef, target: &CellRef) -> String {
        if self.options.relocate_on_copy && is_formula(raw) {
            let delta_rows = target.row as isize - source.row as isize;
            let delta_cols = target.col as isize - source.col as isize;
            relocate_formula(raw, delta_rows, delta_cols)
        } else {
            raw.to_string()
        }
    }

    /// Pointer down: start a selection at `cell_ref`, which also becomes the focus.
    pub fn press(&mut self, cell_ref: CellRef) {
        self.selection.press(cell_ref);
    }

    /// Pointer entered a cell while selecting.
    pub fn enter(&mut self, cell_ref: CellRef) -> bool {
        self.selection.enter(cell_ref)
    }

    /// Pointer released. A multi-cell selection is filled with the content of the
    /// last cell added to it.
    pub fn release(&mut self) -> RecalcReport {
        let mut report = RecalcReport::default();
        let Some(plan) = self.selection.release() else {
            return report;
        };
        let raw = self.store.get(&plan.source);
        debug!("fill {} cells from {}", plan.targets.len(), plan.source);
        for target in plan.targets {
            let content = self.copied_content(&raw, &plan.source, &target);
            report.merge(self.set_cell(target, &content));
        }
        report
    }

    /// Pick up the raw content of `cell_ref` for drag-and-drop.
    pub fn drag_start(&mut self, cell_ref: CellRef) {
        let raw = self.store.get(&cell_ref);
        self.selection.drag_start(cell_ref, raw);
    }

    /// Drop the dragged content onto `cell_ref`. None when nothing was dragged.
    pub fn drop_on(&mut self, cell_ref: CellRef) -> Option<RecalcReport> {
        let payload = self.selection.take_drop()?;
        let content = self.copied_content(&payload.value, &payload.source, &cell_ref);
        Some(self.set_cell(cell_ref, &content))
    }

    pub fn cancel_drag(&mut self) {
        self.selection.cancel_drag();
    }

    pub fn focused(&self) -> Option<&CellRef> {
        self.selection.anchor()
    }

    /// Raw content of the focused cell.
    pub fn formula_bar(&self) -> Option<String> {
        self.focused().map(|cell_ref| self.store.get(cell_ref))
    }

    /// Edit the focused cell. None when nothing is focused.
    pub fn edit_focused(&mut self, raw: &str) -> Option<RecalcReport> {
        let cell_ref = self.focused()?.clone();
        Some(self.set_cell(cell_ref, raw))
    }
}
