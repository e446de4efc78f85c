//! Ego networks: the subgraph induced by a node and its neighbors.

use petgraph::graph::NodeIndex;

/// The subgraph induced on a center node and everything adjacent to it.
///
/// Only membership and the induced edge list are kept; edge weights are not
/// needed by any consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgoNetwork {
    center: NodeIndex,
    /// Center first, then alters in neighbor order.
    members: Vec<NodeIndex>,
    /// Induced edges, each once.
    edges: Vec<(NodeIndex, NodeIndex)>,
}

impl EgoNetwork {
    /// Assemble an ego network. `members` must start with `center`.
    #[must_use]
    pub const fn new(
        center: NodeIndex,
        members: Vec<NodeIndex>,
        edges: Vec<(NodeIndex, NodeIndex)>,
    ) -> Self {
        Self {
            center,
            members,
            edges,
        }
    }

    #[must_use]
    pub const fn center(&self) -> NodeIndex {
        self.center
    }

    /// Node count, including the center.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Induced edge count.
    #[must_use]
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Induced edges that do not touch the center (ties among alters).
    #[must_use]
    pub fn alter_ties(&self) -> usize {
        self.edges
            .iter()
            .filter(|(a, b)| *a != self.center && *b != self.center)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.members.iter().copied()
    }

    #[must_use]
    pub fn edges(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.edges
    }
}
