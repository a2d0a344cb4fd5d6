//! Direct dependency bookkeeping for formula cells.

use cellgrid_engine::engine::{CellRef, extract_dependencies, is_formula};
use std::collections::{HashMap, HashSet};

/// Per formula cell, the set of cells its expression names.
///
/// Records hold written coordinates only; no transitive closure is kept. A reverse
/// index answers "who reads this cell" without scanning every record.
#[derive(Clone, Debug, Default)]
pub struct DependencyTracker {
    /// formula cell -> cells it references
    records: HashMap<CellRef, HashSet<CellRef>>,
    /// referenced cell -> formula cells that reference it
    dependents: HashMap<CellRef, HashSet<CellRef>>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the references of `expression` for `cell_ref`, replacing any prior record.
    pub fn record(&mut self, cell_ref: &CellRef, expression: &str) {
        self.remove(cell_ref);
        let refs: HashSet<CellRef> = extract_dependencies(expression).into_iter().collect();
        for dep in &refs {
            self.dependents
                .entry(dep.clone())
                .or_default()
                .insert(cell_ref.clone());
        }
        self.records.insert(cell_ref.clone(), refs);
    }

    /// Drop the record for `cell_ref`, if any.
    pub fn remove(&mut self, cell_ref: &CellRef) {
        let Some(old) = self.records.remove(cell_ref) else {
            return;
        };
        for dep in old {
            if let Some(set) = self.dependents.get_mut(&dep) {
                set.remove(cell_ref);
                if set.is_empty() {
                    self.dependents.remove(&dep);
                }
            }
        }
    }

    /// Formula cells whose record contains `cell_ref`, row-major. Direct only.
    pub fn dependents_of(&self, cell_ref: &CellRef) -> Vec<CellRef> {
        sorted(self.dependents.get(cell_ref))
    }

    /// Cells the formula at `cell_ref` references, row-major.
    pub fn precedents_of(&self, cell_ref: &CellRef) -> Vec<CellRef> {
        sorted(self.records.get(cell_ref))
    }

    pub fn is_tracked(&self, cell_ref: &CellRef) -> bool {
        self.records.contains_key(cell_ref)
    }

    /// Every cell with a record, row-major.
    pub fn formula_cells(&self) -> Vec<CellRef> {
        let mut cells: Vec<CellRef> = self.records.keys().cloned().collect();
        cells.sort();
        cells
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute every record from raw content.
    /// Call this after cells are replaced wholesale.
    pub fn rebuild<'a, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (&'a CellRef, &'a String)>,
    {
        self.records.clear();
        self.dependents.clear();
        for (cell_ref, raw) in cells {
            if is_formula(raw) {
                self.record(cell_ref, raw);
            }
        }
    }
}

fn sorted(set: Option<&HashSet<CellRef>>) -> Vec<CellRef> {
    let mut cells: Vec<CellRef> = set.map(|s| s.iter().cloned().collect()).unwrap_or_default();
    cells.sort();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn a1(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_record_and_lookup() {
        let mut deps = DependencyTracker::new();
        deps.record(&a1("C1"), "=A1+B1+A1");
        deps.record(&a1("D1"), "=A1*2");

        assert_eq!(deps.precedents_of(&a1("C1")), vec![a1("A1"), a1("B1")]);
        assert_eq!(deps.dependents_of(&a1("A1")), vec![a1("C1"), a1("D1")]);
        assert_eq!(deps.dependents_of(&a1("B1")), vec![a1("C1")]);
        assert!(deps.dependents_of(&a1("Z9")).is_empty());
    }

    #[test]
    fn test_record_replaces_wholesale() {
        let mut deps = DependencyTracker::new();
        deps.record(&a1("C1"), "=A1");
        deps.record(&a1("C1"), "=B1");

        assert!(deps.dependents_of(&a1("A1")).is_empty());
        assert_eq!(deps.dependents_of(&a1("B1")), vec![a1("C1")]);
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_remove_clears_reverse_index() {
        let mut deps = DependencyTracker::new();
        deps.record(&a1("C1"), "=A1");
        deps.remove(&a1("C1"));

        assert!(!deps.is_tracked(&a1("C1")));
        assert!(deps.dependents_of(&a1("A1")).is_empty());
        assert!(deps.is_empty());
    }

    #[test]
    fn test_dependents_are_direct_only() {
        let mut deps = DependencyTracker::new();
        deps.record(&a1("B1"), "=A1+1");
        deps.record(&a1("C1"), "=B1+1");
        assert_eq!(deps.dependents_of(&a1("A1")), vec![a1("B1")]);
    }

    #[test]
    fn test_formula_without_references_is_tracked() {
        let mut deps = DependencyTracker::new();
        deps.record(&a1("A1"), "=1+2");
        assert!(deps.is_tracked(&a1("A1")));
        assert!(deps.precedents_of(&a1("A1")).is_empty());
    }

    #[test]
    fn test_rebuild_skips_plain_cells() {
        let mut cells = BTreeMap::new();
        cells.insert(a1("A1"), "5".to_string());
        cells.insert(a1("B1"), "=A1+1".to_string());
        cells.insert(a1("C1"), "A1".to_string());

        let mut deps = DependencyTracker::new();
        deps.record(&a1("Z1"), "=A1");
        deps.rebuild(&cells);

        assert_eq!(deps.formula_cells(), vec![a1("B1")]);
        assert_eq!(deps.dependents_of(&a1("A1")), vec![a1("B1")]);
    }
}
