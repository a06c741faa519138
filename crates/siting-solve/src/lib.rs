//! `siting-solve`: facility-location optimization.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`lp`]      | `LinearProgram`, `LpBackend` trait, `LpStatus`, `SolveLimits` |
//! | [`highs_backend`] | `HighsBackend` (feature = `"highs"` only)                     |
//! | [`problem`] | `FacilityProblem`: demand set, candidate set, `K`            |
//! | [`solver`]  | `FacilityLocationSolver`, `OptimizationResult`                |
//! | [`error`]   | `SolveError`, `SolveResult<T>`                                |
//!
//! # Pluggability
//!
//! The solver only builds coefficients and interprets the backend's status.
//! Any mathematical-programming library can be dropped in by implementing
//! [`LpBackend`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|------------------------------------------------------|
//! | `highs` | *(default)* Enables [`HighsBackend`].                |

pub mod error;
pub mod lp;
pub mod problem;
pub mod solver;

#[cfg(feature = "highs")]
pub mod highs_backend;


pub use error::{SolveError, SolveResult};
pub use lp::{ColumnId, LinearProgram, LpBackend, LpOutcome, LpStatus, SolveLimits};
pub use problem::FacilityProblem;
pub use solver::{Assignment, FacilityLocationSolver, OptimizationResult};

#[cfg(feature = "highs")]
pub use highs_backend::HighsBackend;
