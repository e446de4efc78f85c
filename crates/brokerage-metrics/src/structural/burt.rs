//! Effective size, efficiency and constraint for a single ego.

use brokerage_graph::{GraphAccess, NodeIndex};

use super::memo::StructuralContext;

/// Burt's effective size of `v`: the number of alters minus their
/// redundancy. `NaN` when `v` has no neighbors.
pub fn effective_size_at<G: GraphAccess + ?Sized>(
    ctx: &mut StructuralContext<'_, G>,
    v: NodeIndex,
) -> f64 {
    let alters = ctx.alters(v);
    if alters.is_empty() {
        return f64::NAN;
    }

    let graph = ctx.graph();
    if !graph.is_directed() && ctx.weight().is_none() {
        // Unweighted undirected: n - 2t/n, with t the ties among alters.
        let ego = graph.ego_subgraph(v);
        if ego.len() <= 1 {
            return 0.0;
        }
        let n = (ego.len() - 1) as f64;
        return n - 2.0 * ego.alter_ties() as f64 / n;
    }

    alters.iter().map(|&u| ctx.redundancy(v, u)).sum()
}

/// Effective size over (weighted) degree.
pub fn efficiency_at<G: GraphAccess + ?Sized>(
    ctx: &mut StructuralContext<'_, G>,
    v: NodeIndex,
) -> f64 {
    effective_size_at(ctx, v) / ctx.graph().degree(v, ctx.weight())
}

/// Burt's aggregate constraint on `v`. `NaN` when `v` has no neighbors.
pub fn constraint_at<G: GraphAccess + ?Sized>(
    ctx: &mut StructuralContext<'_, G>,
    v: NodeIndex,
) -> f64 {
    let alters = ctx.alters(v);
    if alters.is_empty() {
        return f64::NAN;
    }
    alters.iter().map(|&u| ctx.local_constraint(v, u)).sum()
}
