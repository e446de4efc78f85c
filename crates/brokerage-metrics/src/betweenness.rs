//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. High-betweenness nodes are brokers: many
//! shortest paths depend on them.
//!
//! # Algorithm
//!
//! Brandes (2001), for unweighted (BFS) and weighted (Dijkstra) graphs:
//!
//! 1. For each source node `s`, run the [`PathOracle`] to get the visitation
//!    order, predecessors, and shortest-path counts.
//! 2. Accumulate dependency scores in reverse visitation order (farthest
//!    nodes first) with [`accumulate`].
//! 3. Sum the dependency scores across all source nodes.
//! 4. [`rescale`] by graph size and directedness.
//!
//! Complexity: O(V * E) unweighted, O(V * E + V² log V) weighted.
//!
//! # Output
//!
//! A `HashMap<String, f64>` with an entry for every node label. Isolated
//! nodes and nodes on no shortest path score 0.0.

use std::collections::HashMap;

use brokerage_graph::{GraphAccess, NodeIndex};
use tracing::{debug, instrument};

use crate::config::CentralityConfig;
use crate::error::Result;
use crate::parallel::{SummedScores, map_reduce};
use crate::paths::{PathOracle, ShortestPathResult};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Parameters for [`betweenness_centrality`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetweennessOptions {
    /// Edge attribute used as path length. `None` = unweighted.
    pub weight: Option<String>,
    /// Divide by the number of (ordered) pairs that could route through a node.
    /// Default: true.
    pub normalized: bool,
    /// Count the endpoints of each path as lying on it.
    /// Default: false.
    pub endpoints: bool,
}

impl Default for BetweennessOptions {
    fn default() -> Self {
        Self {
            weight: None,
            normalized: true,
            endpoints: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Betweenness
// ---------------------------------------------------------------------------

/// Compute betweenness centrality for every node.
///
/// Runs sharded when the graph reaches `config.parallel_threshold` nodes;
/// both paths produce the same totals up to floating-point summation order.
///
/// # Errors
///
/// - [`crate::CentralityError::InvalidWeight`] for a negative or non-finite
///   weight when `options.weight` is set.
/// - [`crate::CentralityError::WorkerFailure`] if a shard fails.
#[instrument(skip(graph, config))]
pub fn betweenness_centrality<G: GraphAccess + ?Sized>(
    graph: &G,
    options: &BetweennessOptions,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(HashMap::new());
    }

    let oracle = PathOracle::select(graph, options.weight.as_deref())?;
    debug!(?oracle, n, "computing betweenness");

    let mut totals = map_reduce(&graph.nodes(), n, config, |sources: &[NodeIndex]| {
        let mut partial = SummedScores::zeros(n);
        for &s in sources {
            let paths = oracle.shortest_paths(graph, s);
            accumulate(&mut partial.0, &paths, options.endpoints);
        }
        Ok(partial)
    })?;

    rescale(
        &mut totals.0,
        n,
        options.normalized,
        graph.is_directed(),
        options.endpoints,
    );

    Ok(totals.into_labelled(graph))
}

// ---------------------------------------------------------------------------
// Dependency accumulation
// ---------------------------------------------------------------------------

/// Fold one source's pair dependencies into `betweenness`.
///
/// Walks `paths.order` from the farthest node back to the source. For each
/// `w`, every predecessor `v` gains `path_count[v] * (1 + delta[w]) /
/// path_count[w]`. Without endpoints, `delta[w]` is added to every `w` other
/// than the source. With endpoints, the source first gains `|order| - 1` and
/// every other `w` gains `delta[w] + 1`.
pub fn accumulate(betweenness: &mut [f64], paths: &ShortestPathResult, include_endpoints: bool) {
    let s = paths.source;

    if include_endpoints {
        betweenness[s.index()] += (paths.order.len() - 1) as f64;
    }

    // Transient dependency table for this source.
    let mut delta: Vec<f64> = vec![0.0; betweenness.len()];

    for &w in paths.order.iter().rev() {
        let wi = w.index();
        // Every node in `order` is reachable, so path_count[w] >= 1.
        let coeff = (1.0 + delta[wi]) / paths.path_count[wi];

        for &v in &paths.predecessors[wi] {
            delta[v.index()] += paths.path_count[v.index()] * coeff;
        }

        if w != s {
            betweenness[wi] += if include_endpoints {
                delta[wi] + 1.0
            } else {
                delta[wi]
            };
        }
    }
}

// ---------------------------------------------------------------------------
// Rescaling
// ---------------------------------------------------------------------------

/// The factor [`rescale`] applies, or `None` to leave totals unchanged.
///
/// | normalized | endpoints | n      | scale            |
/// |------------|-----------|--------|------------------|
/// | true       | true      | n < 2  | none             |
/// | true       | true      | n >= 2 | 1 / (n(n-1))     |
/// | true       | false     | n <= 2 | none             |
/// | true       | false     | n > 2  | 1 / ((n-1)(n-2)) |
/// | false      | any       | directed   | none         |
/// | false      | any       | undirected | 0.5          |
#[must_use]
pub fn rescale_factor(n: usize, normalized: bool, directed: bool, endpoints: bool) -> Option<f64> {
    let nf = n as f64;
    if normalized {
        if endpoints {
            (n >= 2).then(|| 1.0 / (nf * (nf - 1.0)))
        } else {
            (n > 2).then(|| 1.0 / ((nf - 1.0) * (nf - 2.0)))
        }
    } else if directed {
        None
    } else {
        Some(0.5)
    }
}

/// Normalize accumulated totals in place by graph size and directedness.
pub fn rescale(betweenness: &mut [f64], n: usize, normalized: bool, directed: bool, endpoints: bool) {
    if let Some(scale) = rescale_factor(n, normalized, directed, endpoints) {
        for b in betweenness.iter_mut() {
            *b *= scale;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use brokerage_graph::AttributedGraph;

    fn raw() -> BetweennessOptions {
        BetweennessOptions {
            normalized: false,
            ..BetweennessOptions::default()
        }
    }

    fn run(g: &AttributedGraph, options: &BetweennessOptions) -> HashMap<String, f64> {
        betweenness_centrality(g, options, &CentralityConfig::default()).expect("betweenness")
    }

    #[test]
    fn empty_graph_returns_empty() {
        let g = AttributedGraph::from_edges(false, &[]);
        assert!(run(&g, &BetweennessOptions::default()).is_empty());
    }

    #[test]
    fn single_node_zero_betweenness() {
        let mut builder = brokerage_graph::GraphBuilder::undirected();
        builder.add_node("A");
        let g = builder.build();
        assert_eq!(run(&g, &BetweennessOptions::default()).get("A"), Some(&0.0));
    }

    #[test]
    fn linear_chain_middle_node_has_betweenness() {
        // A - B - C: B lies on the only A..C path.
        let g = AttributedGraph::from_edges(false, &[("A", "B"), ("B", "C")]);
        let bc = run(&g, &BetweennessOptions::default());

        assert!((bc["A"] - 0.0).abs() < 1e-10, "A is a leaf");
        assert!((bc["B"] - 1.0).abs() < 1e-10, "B normalized to 1.0");
        assert!((bc["C"] - 0.0).abs() < 1e-10, "C is a leaf");
    }

    #[test]
    fn directed_diamond_splits_credit() {
        // A → B → D, A → C → D: two shortest A→D paths.
        let g = AttributedGraph::from_edges(true, &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let bc = run(&g, &raw());

        assert!((bc["A"] - 0.0).abs() < 1e-10);
        assert!((bc["B"] - 0.5).abs() < 1e-10, "got {}", bc["B"]);
        assert!((bc["C"] - 0.5).abs() < 1e-10, "got {}", bc["C"]);
        assert!((bc["D"] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn directed_chain_of_four() {
        // A → B → C → D: B on A→C, A→D; C on A→D, B→D.
        let g = AttributedGraph::from_edges(true, &[("A", "B"), ("B", "C"), ("C", "D")]);
        let bc = run(&g, &raw());

        assert!((bc["B"] - 2.0).abs() < 1e-10, "got {}", bc["B"]);
        assert!((bc["C"] - 2.0).abs() < 1e-10, "got {}", bc["C"]);
    }

    #[test]
    fn endpoints_credit_sources_and_targets() {
        // Undirected path A - B - C with endpoints: every node is on the
        // paths it terminates.
        let g = AttributedGraph::from_edges(false, &[("A", "B"), ("B", "C")]);
        let options = BetweennessOptions {
            normalized: false,
            endpoints: true,
            ..BetweennessOptions::default()
        };
        let bc = run(&g, &options);

        // Ordered pairs: A touches 4 (A→B, A→C, B→A, C→A), B all 6, C 4.
        assert!((bc["A"] - 2.0).abs() < 1e-10, "got {}", bc["A"]);
        assert!((bc["B"] - 3.0).abs() < 1e-10, "got {}", bc["B"]);
        assert!((bc["C"] - 2.0).abs() < 1e-10, "got {}", bc["C"]);
    }

    #[test]
    fn weighted_route_moves_betweenness() {
        // Direct A - C is expensive; the cheap route goes through B.
        let g = AttributedGraph::from_weighted_edges(
            false,
            "w",
            &[("A", "C", 10.0), ("A", "B", 1.0), ("B", "C", 1.0)],
        );
        let options = BetweennessOptions {
            weight: Some("w".into()),
            ..raw()
        };
        let weighted = run(&g, &options);
        let unweighted = run(&g, &raw());

        assert!((weighted["B"] - 1.0).abs() < 1e-10, "got {}", weighted["B"]);
        assert!(unweighted["B"].abs() < 1e-10, "triangle has no broker");
    }

    #[test]
    fn zero_weight_edge_keeps_single_broker() {
        // A -0- B -1- C: B lies on the one A..C path only.
        let g = AttributedGraph::from_weighted_edges(false, "w", &[("A", "B", 0.0), ("B", "C", 1.0)]);
        let options = BetweennessOptions {
            weight: Some("w".into()),
            ..raw()
        };
        let bc = run(&g, &options);

        assert!((bc["B"] - 1.0).abs() < 1e-10, "got {}", bc["B"]);
        assert!(bc["A"].abs() < 1e-10, "got {}", bc["A"]);
        assert!(bc["C"].abs() < 1e-10, "got {}", bc["C"]);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let g = AttributedGraph::from_weighted_edges(false, "w", &[("A", "B", -1.0)]);
        let options = BetweennessOptions {
            weight: Some("w".into()),
            ..BetweennessOptions::default()
        };
        assert!(betweenness_centrality(&g, &options, &CentralityConfig::default()).is_err());
    }

    #[test]
    fn rescale_factor_table() {
        assert_eq!(rescale_factor(1, true, false, true), None);
        assert_eq!(rescale_factor(4, true, false, true), Some(1.0 / 12.0));
        assert_eq!(rescale_factor(2, true, true, false), None);
        assert_eq!(rescale_factor(5, true, true, false), Some(1.0 / 12.0));
        assert_eq!(rescale_factor(5, false, true, false), None);
        assert_eq!(rescale_factor(5, false, false, true), Some(0.5));
    }

    #[test]
    fn two_node_normalized_values_unchanged() {
        let mut values = vec![3.0, 7.0];
        rescale(&mut values, 2, true, false, false);
        assert_eq!(values, vec![3.0, 7.0]);
    }

    #[test]
    fn five_node_undirected_raw_is_halved() {
        let unscaled = vec![0.0, 6.0, 8.0, 6.0, 0.0];
        let mut values = unscaled.clone();
        rescale(&mut values, 5, false, false, false);
        for (scaled, original) in values.iter().zip(&unscaled) {
            assert_eq!(*scaled, original * 0.5);
        }
    }

    #[test]
    fn accumulate_resets_dependencies_per_source() {
        let g = AttributedGraph::from_edges(false, &[("A", "B"), ("B", "C")]);
        let b = g.node_index("B").expect("B");
        let mut totals = vec![0.0; 3];
        for s in g.nodes() {
            accumulate(&mut totals, &PathOracle::Unweighted.shortest_paths(&g, s), false);
        }
        // Ordered pairs A→C and C→A both route through B.
        assert!((totals[b.index()] - 2.0).abs() < 1e-12);
    }
}
