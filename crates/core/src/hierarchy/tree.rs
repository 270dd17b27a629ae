//! Parent-chain traversal over a flat asset list.
//!
//! Each row points at its parent by id. Following those pointers from every
//! row either reaches a root, runs into a parent id that is not in the set
//! (an orphan, where the walk simply stops), or loops. The walk is memoised:
//! once a row's fate is known, later walks that reach it stop there, so the
//! whole pass visits every row once.

use std::collections::HashMap;

use super::normalizer::ParsedAsset;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Resolved,
}

/// Result of [`walk_parent_chains`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainWalk {
    /// Each loop as row indices in parent-following order, in the order the
    /// loops were discovered.
    pub cycles: Vec<Vec<usize>>,
    /// Distance from each row to its root (roots are 0). `None` when the
    /// chain ends at a missing parent or in a loop.
    pub depths: Vec<Option<usize>>,
}

impl ChainWalk {
    pub fn root_count(&self) -> usize {
        self.depths.iter().filter(|d| **d == Some(0)).count()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.depths.iter().flatten().copied().max()
    }
}

/// Map each asset id to the index of the first row carrying it.
///
/// Blank ids are left out; they cannot be referenced.
pub fn first_index_by_id(rows: &[ParsedAsset]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if !row.id.trim().is_empty() {
            index.entry(row.id.as_str()).or_insert(i);
        }
    }
    index
}

/// Follow every row's parent chain once, collecting loops and depths.
///
/// A parent id resolves to the first row with that id; parent ids that do
/// not resolve end the chain without a depth. A blank parent is a root.
pub fn walk_parent_chains(rows: &[ParsedAsset]) -> ChainWalk {
    let n = rows.len();
    let by_id = first_index_by_id(rows);
    let parent_of = |i: usize| -> Option<usize> {
        rows[i].parent_id().and_then(|p| by_id.get(p).copied())
    };

    let mut state = vec![Visit::Unvisited; n];
    let mut depths: Vec<Option<usize>> = vec![None; n];
    let mut path_pos = vec![0usize; n];
    let mut cycles = Vec::new();
    let mut path: Vec<usize> = Vec::new();

    for start in 0..n {
        if state[start] != Visit::Unvisited {
            continue;
        }
        path.clear();
        let mut current = start;

        // Depth of the node the path hangs from, once known.
        let anchor: Option<usize> = loop {
            match state[current] {
                Visit::Resolved => break depths[current],
                Visit::OnPath => {
                    cycles.push(path[path_pos[current]..].to_vec());
                    break None;
                }
                Visit::Unvisited => {
                    state[current] = Visit::OnPath;
                    path_pos[current] = path.len();
                    path.push(current);
                    // A simple path cannot be longer than the row count.
                    if path.len() > n {
                        break None;
                    }
                    if rows[current].parent_id().is_none() {
                        depths[current] = Some(0);
                        path.pop();
                        state[current] = Visit::Resolved;
                        break Some(0);
                    }
                    match parent_of(current) {
                        Some(next) => current = next,
                        None => break None,
                    }
                }
            }
        };

        // Unwind: every row on the path is one step further from the anchor.
        let mut depth = anchor;
        for &row in path.iter().rev() {
            depth = depth.map(|d| d + 1);
            depths[row] = depth;
            state[row] = Visit::Resolved;
        }
    }

    ChainWalk { cycles, depths }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, parent: Option<&str>) -> ParsedAsset {
        ParsedAsset::new(id, format!("Asset {id}"), parent)
    }

    #[test]
    fn forest_has_depths_and_no_cycles() {
        let rows = vec![
            asset("1", None),
            asset("2", Some("1")),
            asset("3", Some("2")),
            asset("4", None),
        ];
        let walk = walk_parent_chains(&rows);
        assert!(walk.cycles.is_empty());
        assert_eq!(walk.depths, vec![Some(0), Some(1), Some(2), Some(0)]);
        assert_eq!(walk.root_count(), 2);
        assert_eq!(walk.max_depth(), Some(2));
    }

    #[test]
    fn children_listed_before_parents_still_resolve() {
        let rows = vec![asset("c", Some("b")), asset("b", Some("a")), asset("a", None)];
        let walk = walk_parent_chains(&rows);
        assert_eq!(walk.depths, vec![Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn three_cycle_is_found_once() {
        let rows = vec![asset("A", Some("B")), asset("B", Some("C")), asset("C", Some("A"))];
        let walk = walk_parent_chains(&rows);
        assert_eq!(walk.cycles, vec![vec![0, 1, 2]]);
        assert_eq!(walk.depths, vec![None, None, None]);
    }

    #[test]
    fn tail_leading_into_cycle_is_not_part_of_it() {
        let rows = vec![
            asset("t", Some("x")),
            asset("x", Some("y")),
            asset("y", Some("x")),
        ];
        let walk = walk_parent_chains(&rows);
        assert_eq!(walk.cycles, vec![vec![1, 2]]);
        assert_eq!(walk.depths[0], None);
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let rows = vec![asset("s", Some("s"))];
        assert_eq!(walk_parent_chains(&rows).cycles, vec![vec![0]]);
    }

    #[test]
    fn orphan_chain_stops_without_depth_or_cycle() {
        let rows = vec![asset("1", Some("99")), asset("2", Some("1"))];
        let walk = walk_parent_chains(&rows);
        assert!(walk.cycles.is_empty());
        assert_eq!(walk.depths, vec![None, None]);
    }

    #[test]
    fn long_chain_is_linear_and_complete() {
        let n = 5_000;
        let rows: Vec<ParsedAsset> = (0..n)
            .map(|i| {
                let parent = (i > 0).then(|| (i - 1).to_string());
                asset(&i.to_string(), parent.as_deref())
            })
            .rev()
            .collect();
        let walk = walk_parent_chains(&rows);
        assert!(walk.cycles.is_empty());
        assert_eq!(walk.max_depth(), Some(n - 1));
        assert_eq!(walk.root_count(), 1);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_occurrence() {
        let rows = vec![asset("a", None), asset("a", Some("b")), asset("b", Some("a"))];
        let walk = walk_parent_chains(&rows);
        assert!(walk.cycles.is_empty());
        assert_eq!(walk.depths, vec![Some(0), Some(2), Some(1)]);
    }
}
