//! Single-source shortest-path enumeration.
//!
//! # Overview
//!
//! Both betweenness and closeness start from the same per-source search:
//! which nodes are reachable, in what order they were settled, how far away
//! they are, who precedes them on a shortest path, and how many shortest
//! paths reach them. [`ShortestPathResult`] carries all of that.
//!
//! # Strategies
//!
//! [`PathOracle`] is chosen once per top-level call:
//!
//! - [`PathOracle::Unweighted`]: breadth-first search (`bfs`).
//! - [`PathOracle::Weighted`]: Dijkstra keyed by an edge attribute
//!   (`dijkstra`). Selecting it validates every edge weight up front, so
//!   a negative or non-finite weight is reported before any work runs.
//!
//! # Known Limitation
//!
//! Dijkstra treats two tentative distances as tied only when they are
//! exactly equal as `f64`. Weights that are not exactly representable can
//! split what should be equal-length paths. No tolerance is applied.

mod bfs;
mod dijkstra;

use brokerage_graph::{GraphAccess, NodeIndex};
use tracing::instrument;

use crate::error::{CentralityError, Result};

// ---------------------------------------------------------------------------
// ShortestPathResult
// ---------------------------------------------------------------------------

/// Outcome of one single-source search.
///
/// Per-node tables are indexed by `NodeIndex::index()` and sized to the
/// graph's node count.
#[derive(Debug, Clone)]
pub struct ShortestPathResult {
    /// The search origin.
    pub source: NodeIndex,
    /// Reachable nodes in non-decreasing distance order, each once.
    /// Reverse iteration visits dependents before their predecessors.
    pub order: Vec<NodeIndex>,
    /// Immediate predecessors of each node on some shortest path.
    pub predecessors: Vec<Vec<NodeIndex>>,
    /// Number of distinct shortest paths from `source`. `path_count[source] == 1`.
    pub path_count: Vec<f64>,
    /// Shortest distance from `source`; `f64::INFINITY` when unreachable.
    pub distance: Vec<f64>,
}

impl ShortestPathResult {
    pub(crate) fn new(source: NodeIndex, n: usize) -> Self {
        let mut path_count = vec![0.0; n];
        path_count[source.index()] = 1.0;
        let mut distance = vec![f64::INFINITY; n];
        distance[source.index()] = 0.0;
        Self {
            source,
            order: Vec::with_capacity(n),
            predecessors: vec![Vec::new(); n],
            path_count,
            distance,
        }
    }

    /// Number of nodes reachable from the source, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.order.len()
    }

    /// Sum of distances to every reachable node.
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.order.iter().map(|v| self.distance[v.index()]).sum()
    }
}

// ---------------------------------------------------------------------------
// PathOracle
// ---------------------------------------------------------------------------

/// Shortest-path strategy, fixed for the duration of one metric call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOracle {
    /// Every edge has length 1.
    Unweighted,
    /// Edge length is the named attribute (1 when absent).
    Weighted { key: String },
}

impl PathOracle {
    /// Pick the strategy for `weight` and validate the graph against it.
    ///
    /// # Errors
    ///
    /// Returns [`CentralityError::InvalidWeight`] if `weight` is given and any
    /// edge resolves to a negative or non-finite length.
    #[instrument(skip(graph))]
    pub fn select<G: GraphAccess + ?Sized>(graph: &G, weight: Option<&str>) -> Result<Self> {
        let Some(key) = weight else {
            return Ok(Self::Unweighted);
        };

        if let Some((u, v, value)) = graph
            .weighted_edges(Some(key))
            .into_iter()
            .find(|(_, _, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(CentralityError::InvalidWeight {
                from: graph.label(u).to_string(),
                to: graph.label(v).to_string(),
                weight: Some(key.to_string()),
                value,
            });
        }

        Ok(Self::Weighted {
            key: key.to_string(),
        })
    }

    /// Run the search from `source`.
    #[must_use]
    pub fn shortest_paths<G: GraphAccess + ?Sized>(
        &self,
        graph: &G,
        source: NodeIndex,
    ) -> ShortestPathResult {
        match self {
            Self::Unweighted => bfs::single_source(graph, source),
            Self::Weighted { key } => dijkstra::single_source(graph, source, key),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
