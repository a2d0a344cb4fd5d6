use cellgrid_engine::engine::{
    CellRef, ERROR_SENTINEL, detect_cycle, evaluate_in_place, format_result, is_formula,
};
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::Sheet;
use crate::options::RecalcMode;

/// Outcome of one recalculation pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecalcReport {
    /// Cells whose computed value was written, in evaluation order.
    pub recomputed: Vec<CellRef>,
    /// Recomputed cells that ended up as `ERROR`.
    pub errors: Vec<CellRef>,
    /// Cells found on or behind a reference cycle.
    pub cycles: Vec<CellRef>,
}

impl RecalcReport {
    pub fn merge(&mut self, other: RecalcReport) {
        self.recomputed.extend(other.recomputed);
        self.errors.extend(other.errors);
        self.cycles.extend(other.cycles);
    }
}

impl Sheet {
    /// Display text for `raw` evaluated in `cell_ref`. Never fails: any evaluation
    /// error becomes the `ERROR` sentinel.
    pub(crate) fn evaluate_cell(&self, cell_ref: &CellRef, raw: &str) -> String {
        let result = evaluate_in_place(raw, cell_ref, self.options.reference_mode, self);
        if let Err(e) = &result {
            debug!("{} = {:?}: {}", cell_ref, raw, e);
        }
        format_result(&result)
    }

    /// Re-evaluate one formula cell from its own raw content and cache the result.
    pub(crate) fn recompute(&mut self, cell_ref: &CellRef, report: &mut RecalcReport) {
        let raw = self.store.get(cell_ref);
        if !is_formula(&raw) {
            self.values.remove(cell_ref);
            return;
        }
        let text = self.evaluate_cell(cell_ref, &raw);
        if text == ERROR_SENTINEL {
            warn!("{} evaluated to {}", cell_ref, ERROR_SENTINEL);
            report.errors.push(cell_ref.clone());
        }
        self.values.insert(cell_ref.clone(), text);
        report.recomputed.push(cell_ref.clone());
    }

    fn mark_cyclic(&mut self, cell_ref: &CellRef, report: &mut RecalcReport) {
        self.values.insert(cell_ref.clone(), ERROR_SENTINEL.to_string());
        if !report.cycles.contains(cell_ref) {
            report.cycles.push(cell_ref.clone());
            report.errors.push(cell_ref.clone());
        }
    }

    /// Cycle reachable from `cell_ref` through its references, if any.
    pub(crate) fn cycle_from(&self, cell_ref: &CellRef) -> Option<Vec<CellRef>> {
        detect_cycle(cell_ref, |c| self.deps.precedents_of(c))
    }

    /// Evaluate a freshly stored formula in its own cell.
    pub(crate) fn recompute_edited(&mut self, cell_ref: &CellRef, report: &mut RecalcReport) {
        match self.cycle_from(cell_ref) {
            Some(path) if path.last() == Some(cell_ref) => {
                warn!(
                    "{} closes a reference cycle: {}",
                    cell_ref,
                    path.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" -> ")
                );
                match self.options.recalc_mode {
                    RecalcMode::Direct => {
                        report.cycles.push(cell_ref.clone());
                        self.recompute(cell_ref, report);
                    }
                    RecalcMode::Transitive => self.mark_cyclic(cell_ref, report),
                }
            }
            Some(_) if self.options.recalc_mode == RecalcMode::Transitive => {
                self.mark_cyclic(cell_ref, report)
            }
            _ => self.recompute(cell_ref, report),
        }
    }

    /// Propagate an edit of `edited` to the formulas that read it.
    pub(crate) fn propagate(&mut self, edited: &CellRef, report: &mut RecalcReport) {
        match self.options.recalc_mode {
            RecalcMode::Direct => {
                for dependent in self.deps.dependents_of(edited) {
                    if &dependent != edited {
                        self.recompute(&dependent, report);
                    }
                }
            }
            RecalcMode::Transitive => {
                let affected = self.downstream_of(edited);
                self.recompute_ordered(affected, report);
            }
        }
        debug!(
            "recalc after {}: {} recomputed, {} errors",
            edited,
            report.recomputed.len(),
            report.errors.len()
        );
    }

    /// Every formula reachable through dependents of `start`, excluding `start`.
    fn downstream_of(&self, start: &CellRef) -> Vec<CellRef> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<CellRef> = VecDeque::from([start.clone()]);
        while let Some(cell_ref) = queue.pop_front() {
            for dependent in self.deps.dependents_of(&cell_ref) {
                if seen.insert(dependent.clone()) {
                    queue.push_back(dependent);
                }
            }
        }
        seen.remove(start);
        let mut cells: Vec<CellRef> = seen.into_iter().collect();
        cells.sort();
        cells
    }

    /// Recompute `cells` so that every cell is evaluated after the cells of the set
    /// it reads. Cells on or behind a cycle get `ERROR` without being evaluated.
    pub(crate) fn recompute_ordered(&mut self, cells: Vec<CellRef>, report: &mut RecalcReport) {
        let mut pending: BTreeSet<CellRef> = BTreeSet::new();
        for cell_ref in cells {
            if self.cycle_from(&cell_ref).is_some() {
                warn!("{} is on or behind a reference cycle", cell_ref);
                self.mark_cyclic(&cell_ref, report);
            } else {
                pending.insert(cell_ref);
            }
        }

        // Kahn's algorithm over the acyclic remainder; the ready set is ordered so
        // ties break row-major.
        let mut indegree: HashMap<CellRef, usize> = pending
            .iter()
            .map(|c| {
                let n = self
                    .deps
                    .precedents_of(c)
                    .iter()
                    .filter(|p| pending.contains(*p))
                    .count();
                (c.clone(), n)
            })
            .collect();
        let mut ready: BTreeSet<CellRef> = indegree
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(c, _)| c.clone())
            .collect();

        while let Some(cell_ref) = ready.pop_first() {
            self.recompute(&cell_ref, report);
            for dependent in self.deps.dependents_of(&cell_ref) {
                if let Some(n) = indegree.get_mut(&dependent) {
                    *n -= 1;
                    if *n == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }
    }

    /// Re-evaluate every formula in dependency order from scratch.
    pub fn recompute_all(&mut self) -> RecalcReport {
        self.values.clear();
        let mut report = RecalcReport::default();
        let cells = self.deps.formula_cells();
        self.recompute_ordered(cells, &mut report);
        debug!(
            "full recalc: {} recomputed, {} errors",
            report.recomputed.len(),
            report.errors.len()
        );
        report
    }

    /// Re-evaluate one formula in place and return its display text.
    /// Repeating this without intervening edits gives the same result.
    pub fn recalculate(&mut self, cell_ref: &CellRef) -> Option<String> {
        if !is_formula(&self.store.get(cell_ref)) {
            return None;
        }
        let mut report = RecalcReport::default();
        self.recompute(cell_ref, &mut report);
        self.values.get(cell_ref).map(|v| v.clone())
    }
}
