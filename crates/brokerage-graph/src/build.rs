//! Attributed graph construction.
//!
//! # Overview
//!
//! [`GraphBuilder`] accumulates labelled nodes and attributed edges and
//! produces an [`AttributedGraph`], a [`petgraph`] `DiGraph` plus a
//! directedness flag. The flag is fixed once `build()` runs.
//!
//! ## Undirected Storage
//!
//! Undirected graphs store each edge once, in the orientation it was first
//! added, and every query walks both directions. Adding `b - a` after
//! `a - b` updates the existing edge instead of creating a parallel one.
//!
//! ## Edge Attributes
//!
//! Each edge carries named numeric attributes ([`EdgeAttrs`]). Metrics pick
//! one attribute as the weight by key; edges without that key weigh 1.
//!
//! ## Content Hash
//!
//! [`AttributedGraph::content_hash`] is a BLAKE3 hash over the node labels
//! and the sorted, attributed edge list. Two graphs with the same hash hold
//! the same data.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use tracing::instrument;

use crate::access::GraphAccess;
use crate::ego::EgoNetwork;

// ---------------------------------------------------------------------------
// EdgeAttrs
// ---------------------------------------------------------------------------

/// Named numeric attributes attached to one edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttrs {
    values: BTreeMap<String, f64>,
}

impl EdgeAttrs {
    /// Resolve the weight under `key`.
    ///
    /// `None` means unweighted (1.0). A key the edge does not carry also
    /// resolves to 1.0.
    #[must_use]
    pub fn weight(&self, key: Option<&str>) -> f64 {
        key.and_then(|k| self.values.get(k).copied())
            .unwrap_or(1.0)
    }

    /// Set (or overwrite) an attribute.
    pub fn set(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Incremental builder for [`AttributedGraph`].
#[derive(Debug)]
pub struct GraphBuilder {
    graph: DiGraph<String, EdgeAttrs>,
    node_map: HashMap<String, NodeIndex>,
    directed: bool,
}

impl GraphBuilder {
    /// Start an empty directed graph.
    #[must_use]
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Start an empty undirected graph.
    #[must_use]
    pub fn undirected() -> Self {
        Self::new(false)
    }

    fn new(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            directed,
        }
    }

    /// Add a node if it is not present yet and return its index.
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(label) {
            return idx;
        }
        let idx = self.graph.add_node(label.to_string());
        self.node_map.insert(label.to_string(), idx);
        idx
    }

    /// Add an edge without attributes. Missing endpoints are created.
    pub fn add_edge(&mut self, from: &str, to: &str) -> &mut Self {
        self.edge_slot(from, to);
        self
    }

    /// Add an edge and set attribute `key` to `value` on it.
    ///
    /// Re-adding an existing edge keeps its other attributes.
    pub fn add_weighted_edge(&mut self, from: &str, to: &str, key: &str, value: f64) -> &mut Self {
        let edge = self.edge_slot(from, to);
        if let Some(attrs) = self.graph.edge_weight_mut(edge) {
            attrs.set(key, value);
        }
        self
    }

    fn edge_slot(&mut self, from: &str, to: &str) -> EdgeIndex {
        let a = self.add_node(from);
        let b = self.add_node(to);

        let existing = if self.directed {
            self.graph.find_edge(a, b)
        } else {
            self.graph.find_edge_undirected(a, b).map(|(e, _)| e)
        };

        existing.unwrap_or_else(|| self.graph.add_edge(a, b, EdgeAttrs::default()))
    }

    /// Freeze the builder into an [`AttributedGraph`].
    #[must_use]
    #[instrument(skip(self))]
    pub fn build(self) -> AttributedGraph {
        let content_hash = compute_content_hash(&self.graph, self.directed);
        AttributedGraph {
            graph: self.graph,
            node_map: self.node_map,
            directed: self.directed,
            content_hash,
        }
    }
}

// ---------------------------------------------------------------------------
// AttributedGraph
// ---------------------------------------------------------------------------

/// A labelled graph with attributed edges.
#[derive(Debug, Clone)]
pub struct AttributedGraph {
    /// Storage. Undirected edges live here once, in insertion orientation.
    pub graph: DiGraph<String, EdgeAttrs>,
    /// Mapping from label to `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    directed: bool,
    content_hash: String,
}

impl AttributedGraph {
    /// Build from an unweighted edge list.
    #[must_use]
    pub fn from_edges(directed: bool, edges: &[(&str, &str)]) -> Self {
        let mut builder = GraphBuilder::new(directed);
        for (a, b) in edges {
            builder.add_edge(a, b);
        }
        builder.build()
    }

    /// Build from an edge list where every edge sets attribute `key`.
    #[must_use]
    pub fn from_weighted_edges(directed: bool, key: &str, edges: &[(&str, &str, f64)]) -> Self {
        let mut builder = GraphBuilder::new(directed);
        for (a, b, w) in edges {
            builder.add_weighted_edge(a, b, key, *w);
        }
        builder.build()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// BLAKE3 hash of nodes and attributed edges, `"blake3:<hex>"`.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    fn incident(&self, v: NodeIndex, weight: Option<&str>) -> Vec<(NodeIndex, f64)> {
        let out = self
            .graph
            .edges_directed(v, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().weight(weight)));
        if self.directed {
            return out.collect();
        }
        let inc = self
            .graph
            .edges_directed(v, Direction::Incoming)
            .map(|e| (e.source(), e.weight().weight(weight)));
        dedup_by_node(out.chain(inc))
    }
}

impl GraphAccess for AttributedGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn nodes(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    fn label(&self, v: NodeIndex) -> &str {
        self.graph.node_weight(v).map_or("", String::as_str)
    }

    fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn neighbors(&self, v: NodeIndex) -> Vec<NodeIndex> {
        if self.directed {
            dedup_nodes(self.graph.neighbors_directed(v, Direction::Outgoing))
        } else {
            dedup_nodes(self.graph.neighbors_undirected(v))
        }
    }

    fn all_neighbors(&self, v: NodeIndex) -> Vec<NodeIndex> {
        dedup_nodes(self.graph.neighbors_undirected(v))
    }

    fn weighted_neighbors(&self, v: NodeIndex, weight: Option<&str>) -> Vec<(NodeIndex, f64)> {
        self.incident(v, weight)
    }

    fn edge_weight(&self, u: NodeIndex, v: NodeIndex, weight: Option<&str>) -> Option<f64> {
        let edge = if self.directed {
            self.graph.find_edge(u, v)
        } else {
            self.graph.find_edge_undirected(u, v).map(|(e, _)| e)
        };
        edge.and_then(|e| self.graph.edge_weight(e))
            .map(|attrs| attrs.weight(weight))
    }

    fn degree(&self, v: NodeIndex, weight: Option<&str>) -> f64 {
        // Self-loops count twice, once per endpoint.
        let out: f64 = self
            .graph
            .edges_directed(v, Direction::Outgoing)
            .map(|e| e.weight().weight(weight))
            .sum();
        let inc: f64 = self
            .graph
            .edges_directed(v, Direction::Incoming)
            .map(|e| e.weight().weight(weight))
            .sum();
        out + inc
    }

    fn ego_subgraph(&self, v: NodeIndex) -> EgoNetwork {
        let mut members = vec![v];
        members.extend(self.all_neighbors(v).into_iter().filter(|&u| u != v));
        let in_ego: HashSet<NodeIndex> = members.iter().copied().collect();

        let edges = members
            .iter()
            .flat_map(|&m| self.graph.edges_directed(m, Direction::Outgoing))
            .filter(|e| in_ego.contains(&e.target()))
            .map(|e| (e.source(), e.target()))
            .collect();

        EgoNetwork::new(v, members, edges)
    }

    fn weighted_edges(&self, weight: Option<&str>) -> Vec<(NodeIndex, NodeIndex, f64)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight().weight(weight)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn dedup_nodes(iter: impl Iterator<Item = NodeIndex>) -> Vec<NodeIndex> {
    let mut seen = HashSet::new();
    iter.filter(|n| seen.insert(*n)).collect()
}

fn dedup_by_node(iter: impl Iterator<Item = (NodeIndex, f64)>) -> Vec<(NodeIndex, f64)> {
    let mut seen = HashSet::new();
    iter.filter(|(n, _)| seen.insert(*n)).collect()
}

/// Hash node labels (insertion order) and the sorted attributed edge list.
fn compute_content_hash(graph: &DiGraph<String, EdgeAttrs>, directed: bool) -> String {
    let mut edges: Vec<(&str, &str, &EdgeAttrs)> = graph
        .edge_references()
        .map(|e| {
            let a = graph[e.source()].as_str();
            let b = graph[e.target()].as_str();
            if !directed && b < a {
                (b, a, e.weight())
            } else {
                (a, b, e.weight())
            }
        })
        .collect();
    edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));

    let mut hasher = blake3::Hasher::new();
    let kind: &[u8] = if directed { b"directed" } else { b"undirected" };
    hasher.update(kind);
    hasher.update(b"\x00");
    for label in graph.node_weights() {
        hasher.update(label.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for (a, b, attrs) in edges {
        hasher.update(a.as_bytes());
        hasher.update(b"\x00");
        hasher.update(b.as_bytes());
        hasher.update(b"\x00");
        for (key, value) in attrs.iter() {
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(&value.to_le_bytes());
        }
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
