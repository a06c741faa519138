//! Solver error type.

use thiserror::Error;

use siting_core::NodeId;

use crate::LpStatus;

/// Errors produced by `siting-solve`.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("facility count must be at least 1")]
    InvalidFacilityCount,

    /// Raised before the backend is invoked.  Recoverable by lowering `K` or
    /// the candidate threshold.
    #[error("only {available} candidate sites for {requested} facilities")]
    InsufficientCandidates { available: usize, requested: usize },

    #[error("node {0} is outside the distance matrix")]
    NodeOutsideMatrix(NodeId),

    /// The backend stopped without an optimal solution.  No retry is made.
    #[error("optimization failed: {status}")]
    OptimizationFailed { status: LpStatus },
}

pub type SolveResult<T> = Result<T, SolveError>;
