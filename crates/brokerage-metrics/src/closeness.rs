//! Closeness centrality with Wasserman-Faust normalization.
//!
//! For each node `u`, with `r` the number of nodes reachable from `u` (`u`
//! included), `D` the sum of their distances and `n` the graph size:
//!
//! ```text
//! C(u) = (r - 1)² / (D · (n - 1))      (0 when D == 0)
//! ```
//!
//! Scaling by `(r - 1) / (n - 1)` keeps nodes in small components from
//! scoring as if they were central to the whole graph. On directed graphs
//! distances are outgoing; run on the reversed graph for incoming closeness.

use std::collections::HashMap;

use brokerage_graph::{GraphAccess, NodeIndex};
use tracing::instrument;

use crate::config::CentralityConfig;
use crate::error::Result;
use crate::parallel::{KeyedScores, map_reduce};
use crate::paths::PathOracle;

/// Closeness of a single node under an already-selected oracle.
#[must_use]
pub fn closeness<G: GraphAccess + ?Sized>(graph: &G, oracle: &PathOracle, source: NodeIndex) -> f64 {
    let paths = oracle.shortest_paths(graph, source);
    let total = paths.total_distance();
    if total == 0.0 {
        return 0.0;
    }
    let reached = (paths.reachable_count() - 1) as f64;
    let others = (graph.node_count() - 1) as f64;
    reached * reached / (total * others)
}

/// Closeness for every node.
///
/// # Errors
///
/// - [`crate::CentralityError::InvalidWeight`] for a bad weight under `weight`.
/// - [`crate::CentralityError::WorkerFailure`] if a shard fails.
#[instrument(skip(graph, config))]
pub fn closeness_centrality<G: GraphAccess + ?Sized>(
    graph: &G,
    weight: Option<&str>,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let oracle = PathOracle::select(graph, weight)?;

    let scores = map_reduce(&graph.nodes(), graph.node_count(), config, |sources: &[NodeIndex]| {
        Ok(KeyedScores(
            sources
                .iter()
                .map(|&s| (s, closeness(graph, &oracle, s)))
                .collect(),
        ))
    })?;

    Ok(scores.into_labelled(graph))
}
