//! Network-subsystem error type.

use thiserror::Error;

use siting_core::NodeId;

/// Errors produced by `siting-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Edge lengths must be finite and non-negative for Dijkstra to be exact.
    #[error("invalid length {weight} on edge {from} - {to}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("malformed distance matrix: {0}")]
    MalformedMatrix(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
