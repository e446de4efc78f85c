//! Burt's hierarchy: how unevenly constraint is spread across alters.

use brokerage_graph::{GraphAccess, NodeIndex};

use super::memo::StructuralContext;

/// Hierarchy of `v`, or `None` when it is undefined (fewer than two alters
/// in the ego network, or zero total constraint).
///
/// ```text
/// H(v) = Σ_w (c_w / C · n) · ln(c_w / C · n) / (n · ln n)
/// ```
///
/// with `c_w` the local constraint of `v` on `w`, `C = Σ c_w` and `n` the
/// number of alters. A zero share contributes 0.
pub fn hierarchy_at<G: GraphAccess + ?Sized>(
    ctx: &mut StructuralContext<'_, G>,
    v: NodeIndex,
) -> Option<f64> {
    let ego = ctx.graph().ego_subgraph(v);
    if ego.len() <= 2 {
        return None;
    }
    let n = (ego.len() - 1) as f64;

    let alters = ctx.alters(v);
    let local: Vec<f64> = alters.iter().map(|&w| ctx.local_constraint(v, w)).collect();
    let total: f64 = local.iter().sum();
    if total == 0.0 {
        return None;
    }

    let scale = n * n.ln();
    Some(
        local
            .iter()
            .map(|&c| {
                let share = c / total * n;
                if share == 0.0 { 0.0 } else { share * share.ln() / scale }
            })
            .sum(),
    )
}
