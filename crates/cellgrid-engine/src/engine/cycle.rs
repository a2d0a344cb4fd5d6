use std::collections::HashSet;

use super::CellRef;

/// Detect circular dependencies reachable from a cell.
///
/// `precedents` returns the cells a formula cell reads (empty for plain cells).
/// Returns Some(path) ending at the repeated cell if a cycle is found, None otherwise.
pub fn detect_cycle<F>(start: &CellRef, precedents: F) -> Option<Vec<CellRef>>
where
    F: Fn(&CellRef) -> Vec<CellRef>,
{
    let mut visiting = HashSet::new();
    let mut done = HashSet::new();
    let mut path = Vec::new();

    if detect_cycle_dfs(start, &precedents, &mut visiting, &mut done, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn detect_cycle_dfs<F>(
    current: &CellRef,
    precedents: &F,
    visiting: &mut HashSet<CellRef>,
    done: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool
where
    F: Fn(&CellRef) -> Vec<CellRef>,
{
    if visiting.contains(current) {
        path.push(current.clone());
        return true;
    }
    if done.contains(current) {
        return false;
    }

    let deps = precedents(current);
    if deps.is_empty() {
        return false;
    }

    visiting.insert(current.clone());
    path.push(current.clone());

    for dep in &deps {
        if detect_cycle_dfs(dep, precedents, visiting, done, path) {
            return true;
        }
    }

    path.pop();
    visiting.remove(current);
    done.insert(current.clone());
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<CellRef, Vec<CellRef>> {
        edges
            .iter()
            .map(|(from, to)| {
                (
                    CellRef::from_str(from).unwrap(),
                    to.iter().map(|t| CellRef::from_str(t).unwrap()).collect(),
                )
            })
            .collect()
    }

    fn check(g: &HashMap<CellRef, Vec<CellRef>>, start: &str) -> Option<Vec<CellRef>> {
        detect_cycle(&CellRef::from_str(start).unwrap(), |c| {
            g.get(c).cloned().unwrap_or_default()
        })
    }

    #[test]
    fn test_detect_cycle_no_cycle() {
        let g = graph(&[("C1", &["A1", "B1"]), ("B1", &["A1"])]);
        assert!(check(&g, "C1").is_none());
    }

    #[test]
    fn test_detect_cycle_direct() {
        let g = graph(&[("A1", &["B1"]), ("B1", &["A1"])]);
        assert!(check(&g, "A1").is_some());
        assert!(check(&g, "B1").is_some());
    }

    #[test]
    fn test_detect_cycle_indirect() {
        let g = graph(&[("A1", &["B1"]), ("B1", &["C1"]), ("C1", &["A1"])]);
        let path = check(&g, "A1").unwrap();
        assert!(path.len() >= 3);
    }

    #[test]
    fn test_detect_cycle_self_reference() {
        let g = graph(&[("A1", &["A1"])]);
        assert!(check(&g, "A1").is_some());
    }

    #[test]
    fn test_detect_cycle_downstream_of_cycle() {
        let g = graph(&[("D1", &["A1"]), ("A1", &["B1"]), ("B1", &["A1"])]);
        assert!(check(&g, "D1").is_some());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let g = graph(&[("D1", &["B1", "C1"]), ("B1", &["A1"]), ("C1", &["A1"])]);
        assert!(check(&g, "D1").is_none());
    }
}
