//! Error types for centrality computations.
//!
//! Undefined metric values (isolated nodes, zero-energy graphs, tiny ego
//! networks) are not errors. They show up in the output map as `NaN` or as a
//! missing key. Only structural failures are reported here, and any of them
//! terminates the whole computation.

/// Errors that abort a top-level centrality call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CentralityError {
    /// The weighted shortest-path oracle met a negative or non-finite weight.
    #[error("invalid weight {value} under key {weight:?} on edge {from} -> {to}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: Option<String>,
        value: f64,
    },

    /// A shard returned an error or panicked. No partial results survive.
    #[error("worker for shard {shard} failed: {message}")]
    WorkerFailure { shard: usize, message: String },

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    /// A requested node label is not in the graph.
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

/// Convenience alias used across the crate.
pub type Result<T, E = CentralityError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_weight_message_names_edge() {
        let err = CentralityError::InvalidWeight {
            from: "a".into(),
            to: "b".into(),
            weight: Some("cost".into()),
            value: -1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("a -> b"), "{msg}");
        assert!(msg.contains("cost"), "{msg}");
    }
}
