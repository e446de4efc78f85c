#![forbid(unsafe_code)]
//! brokerage-metrics library.
//!
//! Node centrality over any [`brokerage_graph::GraphAccess`] implementation:
//! betweenness, closeness, Laplacian, and Burt's structural-hole measures.
//! Every top-level call returns a map keyed by node label.
//!
//! # Conventions
//!
//! - **Errors**: Library calls return [`Result`] with [`CentralityError`];
//!   configuration loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Parallelism**: Graphs at or above [`CentralityConfig::parallel_threshold`]
//!   nodes are sharded across a dedicated thread pool (see [`parallel`]).

pub mod betweenness;
pub mod closeness;
pub mod config;
pub mod error;
pub mod laplacian;
pub mod parallel;
pub mod paths;
pub mod structural;

pub use betweenness::{BetweennessOptions, betweenness_centrality};
pub use closeness::closeness_centrality;
pub use config::{CentralityConfig, load_config};
pub use error::{CentralityError, Result};
pub use laplacian::laplacian_centrality;
pub use paths::{PathOracle, ShortestPathResult};
pub use structural::{Norm, StructuralContext, constraint, effective_size, efficiency, hierarchy};
