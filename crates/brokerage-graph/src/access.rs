//! The read-only capability set that centrality metrics consume.
//!
//! # Overview
//!
//! Metrics never touch graph storage directly. They see a graph only through
//! [`GraphAccess`]: node iteration, neighbor iteration in both orientations,
//! edge-weight lookup, degree, directedness, and ego-network extraction.
//! Any container that honours this trait can be plugged into the engine.
//!
//! ## Weights
//!
//! Every weight-aware method takes `weight: Option<&str>`, an edge attribute
//! key. `None` means the graph is treated as unweighted (every edge weighs
//! 1). `Some(key)` reads that attribute, falling back to 1 for edges that
//! do not carry it.
//!
//! ## Node Indices
//!
//! Indices must be dense: every node's `NodeIndex::index()` lies in
//! `0..node_count()`. Metrics size their per-node tables from that range.
//!
//! ## Thread Safety
//!
//! The trait requires `Sync` so sharded metric runs can hand the same graph
//! to every worker. Implementations must not mutate during a computation.

use petgraph::graph::NodeIndex;

use crate::ego::EgoNetwork;

/// Read-only view of a graph, as consumed by the centrality engine.
pub trait GraphAccess: Sync {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// All nodes, in a stable order for one graph instance.
    fn nodes(&self) -> Vec<NodeIndex>;

    /// Caller-facing identifier of `v`.
    fn label(&self, v: NodeIndex) -> &str;

    /// Resolve an identifier back to its node.
    fn node_index(&self, label: &str) -> Option<NodeIndex>;

    /// Whether edges are ordered pairs. Fixed at construction.
    fn is_directed(&self) -> bool;

    /// Nodes reachable from `v` by one outgoing edge (any incident edge when
    /// undirected). Each neighbor appears once.
    fn neighbors(&self, v: NodeIndex) -> Vec<NodeIndex>;

    /// Nodes connected to `v` by an edge in either direction.
    fn all_neighbors(&self, v: NodeIndex) -> Vec<NodeIndex>;

    /// Outgoing neighbors paired with the weight of the connecting edge.
    fn weighted_neighbors(&self, v: NodeIndex, weight: Option<&str>) -> Vec<(NodeIndex, f64)>;

    /// Weight of the edge `u → v`, or `None` if there is no such edge.
    fn edge_weight(&self, u: NodeIndex, v: NodeIndex, weight: Option<&str>) -> Option<f64>;

    /// Sum of incident edge weights (edge count when `weight` is `None`).
    fn degree(&self, v: NodeIndex, weight: Option<&str>) -> f64;

    /// Subgraph induced on `v` and its neighbors.
    fn ego_subgraph(&self, v: NodeIndex) -> EgoNetwork;

    /// Every edge `(u, v, weight)` once. Undirected edges appear in their
    /// stored orientation.
    fn weighted_edges(&self, weight: Option<&str>) -> Vec<(NodeIndex, NodeIndex, f64)>;
}
