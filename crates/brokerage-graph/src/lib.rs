#![forbid(unsafe_code)]
//! brokerage-graph library.
//!
//! The graph container consumed by `brokerage-metrics`. Metrics only depend
//! on the [`GraphAccess`] trait; [`AttributedGraph`] is the bundled
//! petgraph-backed implementation.
//!
//! # Conventions
//!
//! - **Nodes**: addressed by `petgraph::graph::NodeIndex`, labelled by `String`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod access;
pub mod build;
pub mod ego;

pub use access::GraphAccess;
pub use build::{AttributedGraph, EdgeAttrs, GraphBuilder};
pub use ego::EgoNetwork;
pub use petgraph::graph::NodeIndex;
