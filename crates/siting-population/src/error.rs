//! Population-subsystem error type.

use thiserror::Error;

use siting_core::NodeId;

/// Errors produced by `siting-population`.
#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("population {value} at {node} is negative or not finite")]
    InvalidPopulation { node: NodeId, value: f64 },

    #[error("census tract {index} has invalid population {value}")]
    InvalidTract { index: usize, value: f64 },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("distribution covers {got} nodes but the network has {expected}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("retention factor must lie in (0, 1), got {0}")]
    InvalidRetention(f64),

    /// Total mass drifted beyond floating-point tolerance.  Indicates a
    /// defect in the diffusion step, never bad input.
    #[error("population mass drifted in iteration {iteration}: expected {expected}, got {actual}")]
    Conservation { iteration: u32, expected: f64, actual: f64 },

    #[error("cannot attach census tracts to an empty network")]
    EmptyNetwork,
}

pub type PopulationResult<T> = Result<T, PopulationError>;
