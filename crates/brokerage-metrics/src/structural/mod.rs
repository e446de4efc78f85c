//! Burt's structural-hole measures.
//!
//! # Overview
//!
//! Structural holes are gaps between a node's contacts. A node whose
//! contacts do not know each other brokers between them; a node whose
//! contacts are tightly tied to each other is constrained by them. Four
//! measures quantify this from a node's ego network:
//!
//! - **Effective size**: non-redundant contacts. A star centre with `k`
//!   leaves scores `k`; a clique member scores 1.
//! - **Efficiency**: effective size per unit of (weighted) degree.
//! - **Constraint**: how much the node's time and energy is locked into
//!   contacts that are themselves connected. A star centre scores `1/k`.
//! - **Hierarchy**: how concentrated that constraint is on a few contacts.
//!
//! # Undefined Values
//!
//! Effective size, efficiency and constraint are `NaN` for nodes with no
//! neighbors. Hierarchy leaves the node out of the result map when it has
//! fewer than two alters or zero total constraint.
//!
//! # Caching
//!
//! The pairwise quantities are memoized in a [`StructuralContext`] bound to
//! one weight key. Every top-level call builds fresh contexts (one per shard
//! on the sharded path), so results never depend on earlier calls.

mod burt;
mod hierarchy;
mod memo;

use std::collections::HashMap;

use brokerage_graph::{GraphAccess, NodeIndex};
use tracing::instrument;

use crate::config::CentralityConfig;
use crate::error::{CentralityError, Result};
use crate::parallel::{KeyedScores, map_reduce};

pub use burt::{constraint_at, effective_size_at, efficiency_at};
pub use hierarchy::hierarchy_at;
pub use memo::{Norm, StructuralContext};

/// Resolve requested labels, or every node when `nodes` is `None`.
///
/// # Errors
///
/// Returns [`CentralityError::UnknownNode`] for the first label not in the graph.
pub(crate) fn resolve_nodes<G: GraphAccess + ?Sized>(
    graph: &G,
    nodes: Option<&[&str]>,
) -> Result<Vec<NodeIndex>> {
    match nodes {
        None => Ok(graph.nodes()),
        Some(labels) => labels
            .iter()
            .map(|label| {
                graph
                    .node_index(label)
                    .ok_or_else(|| CentralityError::UnknownNode((*label).to_string()))
            })
            .collect(),
    }
}

/// Score `nodes` with a fresh context per shard. `None` scores are dropped.
fn score_nodes<'g, G, F>(
    graph: &'g G,
    weight: Option<&'g str>,
    nodes: &[NodeIndex],
    config: &CentralityConfig,
    score: F,
) -> Result<HashMap<String, f64>>
where
    G: GraphAccess + ?Sized,
    F: Fn(&mut StructuralContext<'g, G>, NodeIndex) -> Option<f64> + Sync,
{
    let scores = map_reduce(nodes, graph.node_count(), config, |shard: &[NodeIndex]| {
        let mut ctx = StructuralContext::new(graph, weight);
        Ok(KeyedScores(
            shard
                .iter()
                .filter_map(|&v| score(&mut ctx, v).map(|s| (v, s)))
                .collect(),
        ))
    })?;
    Ok(scores.into_labelled(graph))
}

/// Effective size of `nodes` (every node when `None`).
///
/// # Errors
///
/// - [`CentralityError::UnknownNode`] for a label not in the graph.
/// - [`CentralityError::WorkerFailure`] if a shard fails.
#[instrument(skip(graph, nodes, config))]
pub fn effective_size<G: GraphAccess + ?Sized>(
    graph: &G,
    nodes: Option<&[&str]>,
    weight: Option<&str>,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let targets = resolve_nodes(graph, nodes)?;
    score_nodes(graph, weight, &targets, config, |ctx, v| {
        Some(effective_size_at(ctx, v))
    })
}

/// Efficiency of `nodes` (every node when `None`).
///
/// # Errors
///
/// Same as [`effective_size`].
#[instrument(skip(graph, nodes, config))]
pub fn efficiency<G: GraphAccess + ?Sized>(
    graph: &G,
    nodes: Option<&[&str]>,
    weight: Option<&str>,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let targets = resolve_nodes(graph, nodes)?;
    score_nodes(graph, weight, &targets, config, |ctx, v| {
        Some(efficiency_at(ctx, v))
    })
}

/// Constraint of `nodes` (every node when `None`).
///
/// # Errors
///
/// Same as [`effective_size`].
#[instrument(skip(graph, nodes, config))]
pub fn constraint<G: GraphAccess + ?Sized>(
    graph: &G,
    nodes: Option<&[&str]>,
    weight: Option<&str>,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let targets = resolve_nodes(graph, nodes)?;
    score_nodes(graph, weight, &targets, config, |ctx, v| {
        Some(constraint_at(ctx, v))
    })
}

/// Hierarchy of `nodes` (every node when `None`). Nodes where it is
/// undefined are absent from the result.
///
/// # Errors
///
/// Same as [`effective_size`].
#[instrument(skip(graph, nodes, config))]
pub fn hierarchy<G: GraphAccess + ?Sized>(
    graph: &G,
    nodes: Option<&[&str]>,
    weight: Option<&str>,
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>> {
    let targets = resolve_nodes(graph, nodes)?;
    score_nodes(graph, weight, &targets, config, |ctx, v| hierarchy_at(ctx, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerage_graph::{AttributedGraph, GraphBuilder};

    fn star(k: usize) -> AttributedGraph {
        let mut builder = GraphBuilder::undirected();
        for i in 0..k {
            builder.add_edge("hub", &format!("leaf{i}"));
        }
        builder.build()
    }

    fn cfg() -> CentralityConfig {
        CentralityConfig::default()
    }

    #[test]
    fn star_centre_is_a_pure_broker() {
        let g = star(5);

        let es = effective_size(&g, None, None, &cfg()).expect("effective size");
        assert!((es["hub"] - 5.0).abs() < 1e-12);
        assert!((es["leaf0"] - 1.0).abs() < 1e-12);

        let c = constraint(&g, None, None, &cfg()).expect("constraint");
        assert!((c["hub"] - 0.2).abs() < 1e-12);
        assert!((c["leaf3"] - 1.0).abs() < 1e-12);

        let eff = efficiency(&g, None, None, &cfg()).expect("efficiency");
        assert!((eff["hub"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hierarchy_omits_undefined_nodes() {
        let g = star(4);
        let h = hierarchy(&g, None, None, &cfg()).expect("hierarchy");
        assert_eq!(h.len(), 1);
        assert!(h["hub"].abs() < 1e-12);
    }

    #[test]
    fn isolated_node_is_nan() {
        let mut builder = GraphBuilder::undirected();
        builder.add_edge("a", "b");
        builder.add_node("z");
        let g = builder.build();

        let es = effective_size(&g, None, None, &cfg()).expect("effective size");
        let c = constraint(&g, None, None, &cfg()).expect("constraint");
        let eff = efficiency(&g, None, None, &cfg()).expect("efficiency");
        assert!(es["z"].is_nan());
        assert!(c["z"].is_nan());
        assert!(eff["z"].is_nan());
    }

    #[test]
    fn node_subset_limits_output() {
        let g = star(3);
        let es = effective_size(&g, Some(&["hub", "leaf1"][..]), None, &cfg()).expect("subset");
        assert_eq!(es.len(), 2);
        assert!(es.contains_key("leaf1"));
    }

    #[test]
    fn unknown_node_is_rejected() {
        let g = star(3);
        let err = constraint(&g, Some(&["hub", "nope"][..]), None, &cfg()).expect_err("unknown");
        assert_eq!(err, CentralityError::UnknownNode("nope".into()));
    }

    #[test]
    fn weighted_constraint_uses_tie_strength() {
        let g = AttributedGraph::from_weighted_edges(false, "w", &[("v", "a", 3.0), ("v", "b", 1.0)]);
        let c = constraint(&g, None, Some("w"), &cfg()).expect("constraint");
        assert!((c["v"] - 0.625).abs() < 1e-12, "got {}", c["v"]);

        let eff = efficiency(&g, Some(&["v"][..]), Some("w"), &cfg()).expect("efficiency");
        // No redundancy, so effective size 2 over weighted degree 4.
        assert!((eff["v"] - 0.5).abs() < 1e-12, "got {}", eff["v"]);
    }

    #[test]
    fn directed_ties_count_either_direction() {
        let g = AttributedGraph::from_edges(true, &[("c", "a"), ("b", "c"), ("c", "d")]);
        let es = effective_size(&g, Some(&["c"][..]), None, &cfg()).expect("effective size");
        assert!((es["c"] - 3.0).abs() < 1e-12);

        let con = constraint(&g, Some(&["c"][..]), None, &cfg()).expect("constraint");
        assert!((con["c"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn sharded_run_matches_sequential() {
        let g = AttributedGraph::from_edges(
            false,
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "e"), ("e", "f"), ("f", "d")],
        );
        let seq = constraint(&g, None, None, &CentralityConfig::sequential()).expect("sequential");
        let par = constraint(&g, None, None, &CentralityConfig::always_sharded(3)).expect("sharded");

        assert_eq!(seq.len(), par.len());
        for (label, value) in &seq {
            assert!((value - par[label]).abs() < 1e-12, "{label}");
        }
    }
}
