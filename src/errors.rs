//! Error types for graph decoding, scoring and hyperparameter search.
//!
//! Every error is fatal to the single call that produced it: no partial
//! results are returned and nothing is retried internally.

use thiserror::Error;

/// Errors raised while building a [`crate::graph::Graph`] or querying it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The input matches none of the accepted state shapes.
    #[error("invalid input kind: {0}")]
    InvalidInputKind(String),

    /// The input has the right shape but carries values that cannot encode
    /// a simple undirected graph (non 0/1 flags, self-loops, asymmetry).
    #[error("invalid edge encoding: {0}")]
    InvalidEdgeEncoding(String),

    /// The meaningful half of a LinEnv vector is not a triangular number.
    #[error("inconsistent edge count: {edges} is not n(n-1)/2 for any integer n")]
    InconsistentEdgeCount { edges: usize },

    /// The query is undefined for this graph's node count.
    #[error("domain error: {0}")]
    DomainError(String),
}

/// Errors raised by the hyperparameter search helpers.
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no completed trials yet")]
    NoCompletedTrials,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TuningResult<T> = Result<T, TuningError>;
