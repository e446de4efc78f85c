//! Memoized pairwise quantities behind Burt's measures.
//!
//! A [`StructuralContext`] binds one graph and one weight key for its whole
//! lifetime. Every cached value is therefore valid for exactly one weight
//! interpretation; a call with a different key builds a new context.
//!
//! Contexts are cheap and single-threaded. Each shard of a sharded run
//! builds its own, so no cache is ever shared between workers.

use std::collections::HashMap;
use std::rc::Rc;

use brokerage_graph::{GraphAccess, NodeIndex};

/// How the tie strengths around a node are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Norm {
    /// Divide by the total mutual weight of the node's ties.
    Sum,
    /// Divide by the strongest of the node's ties.
    Max,
}

/// Per-call caches for mutual weights, normalized weights and local
/// constraint.
pub struct StructuralContext<'g, G: GraphAccess + ?Sized> {
    graph: &'g G,
    weight: Option<&'g str>,
    alters: HashMap<NodeIndex, Rc<[NodeIndex]>>,
    scales: HashMap<(NodeIndex, Norm), f64>,
    normalized: HashMap<(NodeIndex, NodeIndex, Norm), f64>,
    local: HashMap<(NodeIndex, NodeIndex), f64>,
}

impl<'g, G: GraphAccess + ?Sized> StructuralContext<'g, G> {
    #[must_use]
    pub fn new(graph: &'g G, weight: Option<&'g str>) -> Self {
        Self {
            graph,
            weight,
            alters: HashMap::new(),
            scales: HashMap::new(),
            normalized: HashMap::new(),
            local: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &'g G {
        self.graph
    }

    #[must_use]
    pub const fn weight(&self) -> Option<&'g str> {
        self.weight
    }

    /// Neighbors of `v` in either direction.
    pub fn alters(&mut self, v: NodeIndex) -> Rc<[NodeIndex]> {
        let graph = self.graph;
        Rc::clone(
            self.alters
                .entry(v)
                .or_insert_with(|| graph.all_neighbors(v).into()),
        )
    }

    /// `w(u → v) + w(v → u)`, a missing edge counting 0.
    #[must_use]
    pub fn mutual_weight(&self, u: NodeIndex, v: NodeIndex) -> f64 {
        let forward = self.graph.edge_weight(u, v, self.weight).unwrap_or(0.0);
        let backward = self.graph.edge_weight(v, u, self.weight).unwrap_or(0.0);
        forward + backward
    }

    fn scale(&mut self, u: NodeIndex, norm: Norm) -> f64 {
        if let Some(&cached) = self.scales.get(&(u, norm)) {
            return cached;
        }
        let alters = self.alters(u);
        let ties = alters.iter().map(|&w| self.mutual_weight(u, w));
        let scale = match norm {
            Norm::Sum => ties.sum(),
            Norm::Max => ties.reduce(f64::max).unwrap_or(0.0),
        };
        self.scales.insert((u, norm), scale);
        scale
    }

    /// Share of `u`'s tie strength invested in `v`, or 0 when `u` has no
    /// tie strength at all.
    pub fn normalized_mutual_weight(&mut self, u: NodeIndex, v: NodeIndex, norm: Norm) -> f64 {
        if let Some(&cached) = self.normalized.get(&(u, v, norm)) {
            return cached;
        }
        let scale = self.scale(u, norm);
        let value = if scale == 0.0 {
            0.0
        } else {
            self.mutual_weight(u, v) / scale
        };
        self.normalized.insert((u, v, norm), value);
        value
    }

    /// `1 - Σ_w p(u, w) · m(v, w)` over the alters `w` of `u`, where `p`
    /// is sum-normalized and `m` max-normalized.
    pub fn redundancy(&mut self, u: NodeIndex, v: NodeIndex) -> f64 {
        let alters = self.alters(u);
        let mut overlap = 0.0;
        for &w in alters.iter() {
            overlap += self.normalized_mutual_weight(u, w, Norm::Sum)
                * self.normalized_mutual_weight(v, w, Norm::Max);
        }
        1.0 - overlap
    }

    /// `(p(u, v) + Σ_w p(u, w) · p(w, v))²` over the alters `w` of `u`.
    pub fn local_constraint(&mut self, u: NodeIndex, v: NodeIndex) -> f64 {
        if let Some(&cached) = self.local.get(&(u, v)) {
            return cached;
        }
        let direct = self.normalized_mutual_weight(u, v, Norm::Sum);
        let alters = self.alters(u);
        let mut indirect = 0.0;
        for &w in alters.iter() {
            indirect += self.normalized_mutual_weight(u, w, Norm::Sum)
                * self.normalized_mutual_weight(w, v, Norm::Sum);
        }
        let value = (direct + indirect).powi(2);
        self.local.insert((u, v), value);
        value
    }
}
