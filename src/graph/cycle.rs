//! Cycle detection for directed graphs over VIDs.

use std::collections::{HashMap, HashSet};

/// A path representing a cycle, closed (first VID repeated at the end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath {
    pub path: Vec<i64>,
}

impl CyclePath {
    /// Create a new cycle path.
    pub fn new(path: Vec<i64>) -> Self {
        Self { path }
    }

    /// Format the cycle as a string.
    pub fn format(&self) -> String {
        self.path
            .iter()
            .map(|vid| vid.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Find any cycle in a digraph given as an adjacency map
/// (`vid -> successors`). Returns None when the graph is acyclic.
///
/// DFS with a grey/black coloring: hitting a grey vertex closes a cycle,
/// and the current stack yields its path.
pub fn find_cycle(adjacency: &HashMap<i64, Vec<i64>>) -> Option<CyclePath> {
    let mut finished: HashSet<i64> = HashSet::new();
    let mut stack: Vec<i64> = Vec::new();
    let mut on_stack: HashSet<i64> = HashSet::new();

    let mut roots: Vec<i64> = adjacency.keys().copied().collect();
    roots.sort_unstable();

    for root in roots {
        if finished.contains(&root) {
            continue;
        }
        if let Some(cycle) = dfs(root, adjacency, &mut finished, &mut stack, &mut on_stack) {
            return Some(cycle);
        }
    }
    None
}

fn dfs(
    current: i64,
    adjacency: &HashMap<i64, Vec<i64>>,
    finished: &mut HashSet<i64>,
    stack: &mut Vec<i64>,
    on_stack: &mut HashSet<i64>,
) -> Option<CyclePath> {
    stack.push(current);
    on_stack.insert(current);

    if let Some(successors) = adjacency.get(&current) {
        for &next in successors {
            if on_stack.contains(&next) {
                // Close the cycle from the first occurrence of `next`.
                let start = stack.iter().position(|&v| v == next).unwrap_or(0);
                let mut path: Vec<i64> = stack[start..].to_vec();
                path.push(next);
                return Some(CyclePath::new(path));
            }
            if !finished.contains(&next) {
                if let Some(cycle) = dfs(next, adjacency, finished, stack, on_stack) {
                    return Some(cycle);
                }
            }
        }
    }

    stack.pop();
    on_stack.remove(&current);
    finished.insert(current);
    None
}
