//! Breadth-first shortest paths for unweighted graphs.

use std::collections::VecDeque;

use brokerage_graph::{GraphAccess, NodeIndex};

use super::ShortestPathResult;

/// BFS from `source`, counting shortest paths and recording predecessors.
///
/// A node's distance is fixed on first discovery. Every edge `v → w` with
/// `dist[w] == dist[v] + 1` adds `v` to `w`'s predecessors and `v`'s path
/// count to `w`'s.
pub(super) fn single_source<G: GraphAccess + ?Sized>(
    graph: &G,
    source: NodeIndex,
) -> ShortestPathResult {
    let n = graph.node_count();
    let mut result = ShortestPathResult::new(source, n);

    // dist[t]: hop count from source (-1 = unvisited).
    let mut dist: Vec<i64> = vec![-1; n];
    dist[source.index()] = 0;

    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let vi = v.index();
        result.order.push(v);
        result.distance[vi] = dist[vi] as f64;

        for w in graph.neighbors(v) {
            let wi = w.index();

            // First visit to w?
            if dist[wi] < 0 {
                dist[wi] = dist[vi] + 1;
                queue.push_back(w);
            }

            // Shortest path to w via v?
            if dist[wi] == dist[vi] + 1 {
                result.path_count[wi] += result.path_count[vi];
                result.predecessors[wi].push(v);
            }
        }
    }

    result
}
