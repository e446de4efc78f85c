//! Sharded map-reduce over the node set.
//!
//! # Overview
//!
//! Every metric family has the same shape: a worker that processes a slice
//! of nodes and returns a self-contained partial result, and a merge that
//! combines partials. [`map_reduce`] runs that shape either directly on the
//! requested node list or, for graphs of at least
//! [`CentralityConfig::parallel_threshold`] nodes, across shards. The
//! decision rests on the size of the whole graph, not of the requested
//! subset:
//!
//! 1. Shuffle the node list with a seeded RNG (spreads expensive nodes).
//! 2. Cut it into chunks of `ceil(len / shard_count)` nodes.
//! 3. Run each chunk on its own thread of a dedicated rayon pool. Workers
//!    share nothing mutable: each builds its own scratch tables and caches.
//! 4. Collect partials over a channel, tagged with their shard id, and merge
//!    them in shard order.
//!
//! The call blocks until every shard reports. If any shard fails or panics,
//! the whole call fails with [`CentralityError::WorkerFailure`].
//!
//! # Merging
//!
//! - [`SummedScores`]: per-node accumulators (betweenness). Merge is
//!   element-wise addition.
//! - [`KeyedScores`]: independently computed per-node values (closeness,
//!   Laplacian, structural holes). Merge is a disjoint union.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use brokerage_graph::{GraphAccess, NodeIndex};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::config::CentralityConfig;
use crate::error::{CentralityError, Result};

// ---------------------------------------------------------------------------
// Partial results
// ---------------------------------------------------------------------------

/// A shard's output, mergeable with another shard's output.
pub trait Partial: Send + Sized {
    #[must_use]
    fn merge(self, other: Self) -> Self;
}

/// Per-node accumulator indexed by `NodeIndex::index()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummedScores(pub Vec<f64>);

impl SummedScores {
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self(vec![0.0; n])
    }

    /// Key every node's total by its label.
    pub fn into_labelled<G: GraphAccess + ?Sized>(self, graph: &G) -> HashMap<String, f64> {
        graph
            .nodes()
            .into_iter()
            .map(|v| (graph.label(v).to_string(), self.0[v.index()]))
            .collect()
    }
}

impl Partial for SummedScores {
    fn merge(mut self, other: Self) -> Self {
        for (acc, x) in self.0.iter_mut().zip(other.0) {
            *acc += x;
        }
        self
    }
}

/// Values for a subset of nodes. Shards never produce the same key twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedScores(pub Vec<(NodeIndex, f64)>);

impl KeyedScores {
    /// Key each value by its node's label.
    pub fn into_labelled<G: GraphAccess + ?Sized>(self, graph: &G) -> HashMap<String, f64> {
        self.0
            .into_iter()
            .map(|(v, score)| (graph.label(v).to_string(), score))
            .collect()
    }
}

impl Partial for KeyedScores {
    fn merge(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Shuffle `nodes` with `seed` and cut them into at most `shard_count`
/// chunks of `ceil(len / shard_count)` nodes.
#[must_use]
pub fn partition(nodes: &[NodeIndex], shard_count: usize, seed: u64) -> Vec<Vec<NodeIndex>> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let mut shuffled = nodes.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    let chunk = nodes.len().div_ceil(shard_count.max(1));
    shuffled.chunks(chunk).map(<[NodeIndex]>::to_vec).collect()
}

// ---------------------------------------------------------------------------
// Map-reduce
// ---------------------------------------------------------------------------

/// Run `worker` over `nodes`, sharded when a graph of `graph_size` nodes
/// reaches the configured threshold.
///
/// # Errors
///
/// On the sequential path, returns whatever `worker` returns. On the sharded
/// path, returns [`CentralityError::WorkerFailure`] if any shard errors or
/// panics, and [`CentralityError::WorkerPool`] if threads cannot start.
#[instrument(skip(nodes, config, worker), fields(node_count = nodes.len()))]
pub fn map_reduce<P, F>(
    nodes: &[NodeIndex],
    graph_size: usize,
    config: &CentralityConfig,
    worker: F,
) -> Result<P>
where
    P: Partial,
    F: Fn(&[NodeIndex]) -> Result<P> + Sync,
{
    if nodes.is_empty() || !config.is_sharded(graph_size) {
        debug!("running sequentially");
        return worker(nodes);
    }

    let shards = partition(nodes, config.shard_count, config.shuffle_seed);
    debug!(
        shards = shards.len(),
        shard_size = shards.first().map_or(0, Vec::len),
        "running sharded"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(shards.len())
        .thread_name(|i| format!("brokerage-shard-{i}"))
        .build()
        .map_err(|e| CentralityError::WorkerPool(e.to_string()))?;

    let (tx, rx) = mpsc::channel::<(usize, Result<P>)>();
    let worker = &worker;

    pool.scope(|scope| {
        for (shard_id, shard) in shards.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| worker(shard)))
                    .unwrap_or_else(|payload| {
                        Err(CentralityError::WorkerFailure {
                            shard: shard_id,
                            message: panic_message(&*payload),
                        })
                    });
                // The receiver outlives the scope, so this cannot fail.
                let _ = tx.send((shard_id, outcome));
            });
        }
    });
    drop(tx);

    let mut reports: Vec<(usize, Result<P>)> = rx.into_iter().collect();
    if reports.len() != shards.len() {
        return Err(CentralityError::WorkerFailure {
            shard: reports.len(),
            message: format!("{} of {} shards reported", reports.len(), shards.len()),
        });
    }
    reports.sort_by_key(|(shard_id, _)| *shard_id);

    let mut merged: Option<P> = None;
    for (shard_id, outcome) in reports {
        let part = outcome.map_err(|err| into_worker_failure(shard_id, err))?;
        merged = Some(match merged {
            Some(acc) => acc.merge(part),
            None => part,
        });
    }

    merged.ok_or_else(|| CentralityError::WorkerFailure {
        shard: 0,
        message: "no shards were scheduled".to_string(),
    })
}

fn into_worker_failure(shard: usize, err: CentralityError) -> CentralityError {
    match err {
        CentralityError::WorkerFailure { .. } => err,
        other => CentralityError::WorkerFailure {
            shard,
            message: other.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
