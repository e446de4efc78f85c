//! Laplacian centrality (Qi et al., 2012).
//!
//! # Definition
//!
//! With `X[i]` the weighted degree of `i` over its outgoing edges and
//! `W[i]` the sum of squared outgoing edge weights, the Laplacian energy is
//!
//! ```text
//! E = Σ X[i]² + Σ W[i]
//! ```
//!
//! Removing node `i` zeroes `X[i]`, lowers `X[j]` by `w(j, i)` for every
//! `j` with an edge into `i`, and drops `2·W[i]`. The centrality of `i` is
//! the relative energy drop `(E - E_i) / E`.
//!
//! A graph with zero energy (no edges, or only zero-weight edges) has no
//! defined centrality: the result map is empty and callers must treat a
//! missing key as undefined.

use std::collections::HashMap;

use brokerage_graph::{GraphAccess, NodeIndex};
use tracing::{instrument, warn};

use crate::config::CentralityConfig;
use crate::error::Result;
use crate::parallel::{KeyedScores, map_reduce};

/// Per-node degree sums that make up the graph's Laplacian energy.
#[derive(Debug, Clone, PartialEq)]
struct EnergyTerms {
    /// Weighted out-degree.
    x: Vec<f64>,
    /// Sum of squared out-edge weights.
    w: Vec<f64>,
    /// Σ x² + Σ w.
    energy: f64,
}

impl EnergyTerms {
    fn compute<G: GraphAccess + ?Sized>(graph: &G, weight: Option<&str>) -> Self {
        let n = graph.node_count();
        let mut x = vec![0.0; n];
        let mut w = vec![0.0; n];

        for i in graph.nodes() {
            for (_, wij) in graph.weighted_neighbors(i, weight) {
                x[i.index()] += wij;
                w[i.index()] += wij * wij;
            }
        }

        let energy = x.iter().map(|xi| xi * xi).sum::<f64>() + w.iter().sum::<f64>();
        Self { x, w, energy }
    }

    /// `E - E_i`: energy lost when `i` and its edges are removed.
    fn drop_without<G: GraphAccess + ?Sized>(
        &self,
        graph: &G,
        i: NodeIndex,
        weight: Option<&str>,
    ) -> f64 {
        let ii = i.index();
        let mut lost = self.x[ii] * self.x[ii] + 2.0 * self.w[ii];

        for j in graph.all_neighbors(i) {
            if j == i {
                continue;
            }
            if let Some(wji) = graph.edge_weight(j, i, weight) {
                let before = self.x[j.index()];
                let after = before - wji;
                lost += before * before - after * after;
            }
        }

        lost
    }
}

/// Laplacian centrality for every node, or an empty map for a zero-energy graph.
///
/// # Errors
///
/// Returns [`crate::CentralityError::WorkerFailure`] if a shard fails.
#[instrument(skip(graph, config))]
pub fn laplacian_centrality<G: GraphAccess + ?Sized>(
    graph: &G,
    weight: Option<&str>,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let terms = EnergyTerms::compute(graph, weight);
    if terms.energy == 0.0 {
        warn!(nodes = graph.node_count(), "graph has zero Laplacian energy; centrality undefined");
        return Ok(HashMap::new());
    }

    let scores = map_reduce(&graph.nodes(), graph.node_count(), config, |nodes: &[NodeIndex]| {
        Ok(KeyedScores(
            nodes
                .iter()
                .map(|&i| (i, terms.drop_without(graph, i, weight) / terms.energy))
                .collect(),
        ))
    })?;

    Ok(scores.into_labelled(graph))
}
