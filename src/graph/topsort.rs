//! Topological ordering using Kahn's algorithm.

use crate::graph::cycle::{find_cycle, CyclePath};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Compute a topological order of the given VIDs under the given edges
/// (`(source, target)` pairs, source before target).
///
/// Kahn's algorithm with a min-heap on VID, so the order is deterministic:
/// among the vertices currently without unvisited predecessors, the
/// smallest VID comes first. On a cyclic input the offending cycle is
/// returned instead.
pub fn topological_order(
    vids: &[i64],
    edges: &[(i64, i64)],
) -> std::result::Result<Vec<i64>, CyclePath> {
    let mut adjacency: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut in_degree: HashMap<i64, i64> = HashMap::new();

    for &vid in vids {
        adjacency.entry(vid).or_default();
        in_degree.entry(vid).or_insert(0);
    }
    for &(source, target) in edges {
        adjacency.entry(source).or_default().push(target);
        *in_degree.entry(target).or_insert(0) += 1;
    }

    let mut heap: BinaryHeap<Reverse<i64>> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&vid, _)| Reverse(vid))
        .collect();

    let mut order = Vec::with_capacity(adjacency.len());

    while let Some(Reverse(vid)) = heap.pop() {
        order.push(vid);

        if let Some(successors) = adjacency.get(&vid) {
            for &next in successors {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        heap.push(Reverse(next));
                    }
                }
            }
        }
    }

    if order.len() != adjacency.len() {
        // Leftover vertices all sit on or behind a cycle.
        let cycle = find_cycle(&adjacency)
            .unwrap_or_else(|| CyclePath::new(Vec::new()));
        return Err(cycle);
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let order = topological_order(&[], &[]).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_no_edges_orders_by_vid() {
        let order = topological_order(&[3, 1, 2], &[]).unwrap();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_chain() {
        let order = topological_order(&[1, 2, 3], &[(3, 2), (2, 1)]).unwrap();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_diamond_is_deterministic() {
        // 1 -> {2, 3} -> 4; 2 and 3 are free together, smaller VID first.
        let order = topological_order(&[1, 2, 3, 4], &[(1, 2), (1, 3), (2, 4), (3, 4)]).unwrap();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_isolated_vertex_participates() {
        let order = topological_order(&[1, 2, 9], &[(2, 1)]).unwrap();
        assert_eq!(order, vec![2, 1, 9]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let result = topological_order(&[1, 2, 3], &[(1, 2), (2, 3), (3, 1)]);
        let cycle = result.unwrap_err();
        assert_eq!(cycle.path, vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_self_loop_is_reported() {
        let result = topological_order(&[1], &[(1, 1)]);
        assert_eq!(result.unwrap_err().path, vec![1, 1]);
    }
}
