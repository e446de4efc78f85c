//! Dijkstra shortest paths for non-negative edge weights.
//!
//! The queue orders entries by tentative distance and breaks ties by
//! insertion sequence, so equal-distance nodes settle in a deterministic
//! order. Each entry remembers the predecessor that pushed it; when a node
//! settles, that predecessor's path count is folded in.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use brokerage_graph::{GraphAccess, NodeIndex};
use fixedbitset::FixedBitSet;

use super::ShortestPathResult;

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    dist: f64,
    seq: u64,
    pred: NodeIndex,
    node: NodeIndex,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Dijkstra from `source` using edge attribute `key` as length.
///
/// Weights must already be validated as finite and non-negative.
pub(super) fn single_source<G: GraphAccess + ?Sized>(
    graph: &G,
    source: NodeIndex,
    key: &str,
) -> ShortestPathResult {
    let n = graph.node_count();
    let mut result = ShortestPathResult::new(source, n);

    // Best tentative distance seen so far (INFINITY = unseen).
    let mut seen = vec![f64::INFINITY; n];
    seen[source.index()] = 0.0;
    let mut settled = FixedBitSet::with_capacity(n);

    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(QueueEntry {
        dist: 0.0,
        seq,
        pred: source,
        node: source,
    });

    while let Some(QueueEntry {
        dist, pred, node: v, ..
    }) = heap.pop()
    {
        let vi = v.index();
        if settled.contains(vi) {
            continue;
        }
        settled.insert(vi);

        if v != source {
            result.path_count[vi] += result.path_count[pred.index()];
        }
        result.order.push(v);
        result.distance[vi] = dist;

        for (w, length) in graph.weighted_neighbors(v, Some(key)) {
            // Self-loops never shorten a path.
            if w == v {
                continue;
            }
            let wi = w.index();
            let vw_dist = dist + length;

            if !settled.contains(wi) && vw_dist < seen[wi] {
                seen[wi] = vw_dist;
                seq += 1;
                heap.push(QueueEntry {
                    dist: vw_dist,
                    seq,
                    pred: v,
                    node: w,
                });
                result.path_count[wi] = 0.0;
                result.predecessors[wi].clear();
                result.predecessors[wi].push(v);
            } else if !settled.contains(wi) && vw_dist == seen[wi] {
                // Exact tie: another shortest path through v. Settled nodes
                // are final; zero-length edges must not feed counts back.
                result.path_count[wi] += result.path_count[vi];
                result.predecessors[wi].push(v);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerage_graph::AttributedGraph;

    fn idx(g: &AttributedGraph, label: &str) -> NodeIndex {
        g.node_index(label).expect("node exists")
    }

    #[test]
    fn lighter_detour_wins() {
        // a - c costs 5 directly, 2 via b.
        let g = AttributedGraph::from_weighted_edges(
            false,
            "w",
            &[("a", "c", 5.0), ("a", "b", 1.0), ("b", "c", 1.0)],
        );
        let a = idx(&g, "a");
        let b = idx(&g, "b");
        let c = idx(&g, "c");

        let r = single_source(&g, a, "w");
        assert!((r.distance[c.index()] - 2.0).abs() < 1e-12);
        assert_eq!(r.predecessors[c.index()], vec![b]);
        assert!((r.path_count[c.index()] - 1.0).abs() < 1e-12);
        assert_eq!(r.order, vec![a, b, c]);
    }

    #[test]
    fn equal_weighted_paths_are_both_counted() {
        // Two routes of cost 3 from a to d.
        let g = AttributedGraph::from_weighted_edges(
            true,
            "w",
            &[("a", "b", 1.0), ("b", "d", 2.0), ("a", "c", 2.0), ("c", "d", 1.0)],
        );
        let a = idx(&g, "a");
        let d = idx(&g, "d");

        let r = single_source(&g, a, "w");
        assert!((r.path_count[d.index()] - 2.0).abs() < 1e-12);
        assert_eq!(r.predecessors[d.index()].len(), 2);
        assert!((r.path_count[a.index()] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn improvement_resets_predecessors() {
        // d is first reached via a (cost 10), then improved via b (cost 2).
        let g = AttributedGraph::from_weighted_edges(
            true,
            "w",
            &[("a", "d", 10.0), ("a", "b", 1.0), ("b", "d", 1.0)],
        );
        let b = idx(&g, "b");
        let d = idx(&g, "d");

        let r = single_source(&g, idx(&g, "a"), "w");
        assert_eq!(r.predecessors[d.index()], vec![b]);
        assert!((r.path_count[d.index()] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_edge_does_not_feed_back_into_settled_nodes() {
        // a -0- b -1- c: one shortest path between every pair.
        let g = AttributedGraph::from_weighted_edges(false, "w", &[("a", "b", 0.0), ("b", "c", 1.0)]);

        for source in ["a", "b", "c"] {
            let r = single_source(&g, idx(&g, source), "w");
            assert_eq!(r.path_count, vec![1.0, 1.0, 1.0], "from {source}");
            assert_eq!(r.order.len(), 3);
        }

        let r = single_source(&g, idx(&g, "b"), "w");
        assert!(r.predecessors[idx(&g, "b").index()].is_empty());
        assert_eq!(r.predecessors[idx(&g, "c").index()], vec![idx(&g, "b")]);
    }

    #[test]
    fn zero_weight_ties_among_unsettled_nodes_still_count() {
        // a -0- c directly, and a -0- b -0- c: two paths of length 0.
        let g = AttributedGraph::from_weighted_edges(
            false,
            "w",
            &[("a", "b", 0.0), ("b", "c", 0.0), ("a", "c", 0.0)],
        );
        let r = single_source(&g, idx(&g, "a"), "w");
        assert!((r.path_count[idx(&g, "a").index()] - 1.0).abs() < f64::EPSILON);
        assert!((r.path_count[idx(&g, "c").index()] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn queue_orders_by_distance_then_sequence() {
        let near = QueueEntry {
            dist: 1.0,
            seq: 5,
            pred: NodeIndex::new(0),
            node: NodeIndex::new(1),
        };
        let far = QueueEntry { dist: 2.0, seq: 1, ..near };
        let near_later = QueueEntry { seq: 6, ..near };

        let mut heap = BinaryHeap::from(vec![far, near_later, near]);
        assert_eq!(heap.pop().map(|e| e.seq), Some(5));
        assert_eq!(heap.pop().map(|e| e.seq), Some(6));
        assert_eq!(heap.pop().map(|e| e.seq), Some(1));
    }
}
