//! Uncapacitated facility location as a linear program.
//!
//! # Formulation
//!
//! ```text
//! minimise    Σ_i Σ_j s_i · d(i,j) · y_ij        s_i = w_i / W
//! subject to  Σ_j x_j      = K
//!             Σ_j y_ij     = 1          for every demand i
//!             y_ij − x_j  ≤ 0          for every (i, j)
//!             0 ≤ x_j, y_ij ≤ 1
//! ```
//!
//! Costs use demand shares `s_i` of the total demand `W`; the reported
//! objective is scaled back by `W` into person-metres.  Neither `x` nor `y`
//! is integral.  The optimal `x_j` is read as a siting aptitude score in
//! `[0, 1]`; ranking those scores picks the sites.
//!
//! # Unreachable pairs
//!
//! A pair with no path is priced at the finite penalty distance
//!
//! ```text
//! P = d_max / max(s_min, 1e-9) + d_max + 1
//! ```
//!
//! where `d_max` is the largest finite demand-to-candidate distance and
//! `s_min` the smallest positive demand share.  One unit of any demand on an
//! unreachable pair then costs more than serving all demand at `d_max`, so
//! such assignments are strictly dominated whenever a reachable alternative
//! exists.  Shares below the floor are too small to matter against the rest
//! of the objective.  A demand node with no reachable candidate still enters
//! the objective at the penalty instead of dropping out.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use siting_core::{NodeId, SitingConfig};
use siting_network::DistanceMatrix;

use crate::lp::{ColumnId, LinearProgram, LpBackend, LpStatus, SolveLimits};
use crate::problem::FacilityProblem;
use crate::{SolveError, SolveResult};

// ── Result ────────────────────────────────────────────────────────────────────

/// Which candidate carries the largest share of one demand node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    pub demand:   NodeId,
    pub facility: NodeId,
    /// `y_ij` of that pair, in `[0, 1]`.
    pub share:    f64,
}

/// Opening weight per candidate plus the objective value.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
    /// `(candidate, x_j)` in the problem's candidate order, each in `[0, 1]`.
    pub weights:     Vec<(NodeId, f64)>,
    /// Objective at the optimum, unreachable pairs priced at the penalty.
    pub objective:   f64,
    pub assignments: Vec<Assignment>,
}

impl OptimizationResult {
    /// Opening weight of `node`, `None` if it was not a candidate.
    pub fn weight(&self, node: NodeId) -> Option<f64> {
        self.weights.iter().find(|&&(n, _)| n == node).map(|&(_, w)| w)
    }

    /// Sum of all opening weights; equals `K` up to solver tolerance.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|&(_, w)| w).sum()
    }
}

// ── Solver ────────────────────────────────────────────────────────────────────

/// Builds the LP for a [`FacilityProblem`] and hands it to a backend.
///
/// The solver holds no state between calls.
#[derive(Clone, Debug)]
pub struct FacilityLocationSolver<B> {
    backend: B,
    limits:  SolveLimits,
}

impl<B: LpBackend> FacilityLocationSolver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, limits: SolveLimits::default() }
    }

    /// Solver with the time limit from `config`.
    pub fn from_config(backend: B, config: &SitingConfig) -> Self {
        Self::new(backend).with_time_limit(config.solver_time_limit())
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.limits.time_limit = limit;
        self
    }

    pub fn limits(&self) -> &SolveLimits {
        &self.limits
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Solve `problem` with distances from `matrix`.
    ///
    /// # Errors
    ///
    /// - [`SolveError::InvalidFacilityCount`] if `K == 0`.
    /// - [`SolveError::InsufficientCandidates`] if there are fewer than `K`
    ///   candidates.  The backend is not called.
    /// - [`SolveError::NodeOutsideMatrix`] for a node id beyond the matrix.
    /// - [`SolveError::OptimizationFailed`] for any non-optimal backend
    ///   status, a timeout included.
    pub fn solve(
        &self,
        problem: &FacilityProblem,
        matrix:  &DistanceMatrix,
    ) -> SolveResult<OptimizationResult> {
        let k = problem.facility_count;
        if k == 0 {
            return Err(SolveError::InvalidFacilityCount);
        }
        if problem.candidates.len() < k {
            return Err(SolveError::InsufficientCandidates {
                available: problem.candidates.len(),
                requested: k,
            });
        }
        let outside = problem
            .demand
            .iter()
            .map(|&(n, _)| n)
            .chain(problem.candidates.iter().copied())
            .find(|n| n.index() >= matrix.len());
        if let Some(node) = outside {
            return Err(SolveError::NodeOutsideMatrix(node));
        }

        let (program, layout) = build_program(problem, matrix);
        info!(
            backend    = self.backend.name(),
            demand     = problem.demand.len(),
            candidates = problem.candidates.len(),
            k,
            columns    = program.column_count(),
            rows       = program.row_count(),
            "solving facility location"
        );

        let started = Instant::now();
        let outcome = self.backend.solve(&program, &self.limits);
        debug!(status = %outcome.status, elapsed = ?started.elapsed(), "backend returned");

        if outcome.status != LpStatus::Optimal {
            warn!(status = %outcome.status, "facility location not solved to optimality");
            return Err(SolveError::OptimizationFailed { status: outcome.status });
        }
        if outcome.values.len() != program.column_count() {
            let status = LpStatus::NotSolved(format!(
                "backend returned {} values for {} columns",
                outcome.values.len(),
                program.column_count()
            ));
            return Err(SolveError::OptimizationFailed { status });
        }

        let objective = layout.scale
            * outcome
                .objective
                .unwrap_or_else(|| program.objective_of(&outcome.values));
        let result = layout.read(problem, &outcome.values, objective);
        info!(
            objective    = result.objective,
            total_weight = result.total_weight(),
            "facility location solved"
        );
        Ok(result)
    }
}

// ── Program construction ──────────────────────────────────────────────────────

/// Smallest demand share the penalty is sized for.  Keeps every cost
/// coefficient far below the backend's infinity threshold.
const MIN_DEMAND_SHARE: f64 = 1e-9;

/// Column positions: `x_j` first, then `y_ij` row-major over (demand, candidate).
///
/// Costs are priced on demand shares `w / scale`; multiplying the program's
/// objective by `scale` gives person-metres.
struct Layout {
    candidates: usize,
    scale:      f64,
}

impl Layout {
    fn x(&self, j: usize) -> ColumnId {
        ColumnId(j)
    }

    fn y(&self, i: usize, j: usize) -> ColumnId {
        ColumnId(self.candidates + i * self.candidates + j)
    }

    fn read(&self, problem: &FacilityProblem, values: &[f64], objective: f64) -> OptimizationResult {
        let weights = problem
            .candidates
            .iter()
            .enumerate()
            .map(|(j, &node)| (node, values[self.x(j).0].clamp(0.0, 1.0)))
            .collect();

        let assignments = problem
            .demand
            .iter()
            .enumerate()
            .filter_map(|(i, &(demand, _))| {
                (0..self.candidates)
                    .map(|j| (j, values[self.y(i, j).0]))
                    // First maximum wins so ties go to the earlier candidate.
                    .fold(None, |best: Option<(usize, f64)>, (j, y)| match best {
                        Some((_, b)) if b >= y => best,
                        _ => Some((j, y)),
                    })
                    .map(|(j, share)| Assignment {
                        demand,
                        facility: problem.candidates[j],
                        share:    share.clamp(0.0, 1.0),
                    })
            })
            .collect();

        OptimizationResult { weights, objective, assignments }
    }
}

/// Penalty distance standing in for an unreachable pair.
///
/// With shares summing to one, `P = d_max / s_min + d_max + 1` outweighs any
/// reshuffle of the reachable assignments.  `s_min` is floored at
/// [`MIN_DEMAND_SHARE`], so `P` stays within `d_max · 1e9`.
fn unreachable_penalty(problem: &FacilityProblem, matrix: &DistanceMatrix, scale: f64) -> f64 {
    let d_max = problem
        .demand
        .iter()
        .flat_map(|&(i, _)| problem.candidates.iter().map(move |&j| matrix.raw(i, j)))
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max);
    let s_min = problem
        .demand
        .iter()
        .map(|&(_, w)| w / scale)
        .filter(|&s| s > 0.0)
        .fold(f64::INFINITY, f64::min);

    if s_min.is_finite() {
        d_max / s_min.max(MIN_DEMAND_SHARE) + d_max + 1.0
    } else {
        d_max + 1.0
    }
}

fn build_program(problem: &FacilityProblem, matrix: &DistanceMatrix) -> (LinearProgram, Layout) {
    let n_i = problem.demand.len();
    let n_j = problem.candidates.len();
    let total = problem.total_demand();
    let scale = if total > 0.0 { total } else { 1.0 };
    let layout = Layout { candidates: n_j, scale };
    let penalty = unreachable_penalty(problem, matrix, scale);

    let mut lp = LinearProgram::with_capacity(n_j + n_i * n_j, 1 + n_i + n_i * n_j);

    for _ in 0..n_j {
        lp.add_column(0.0, 0.0, 1.0);
    }
    let mut unreachable = 0usize;
    for &(i, w) in &problem.demand {
        for &j in &problem.candidates {
            let d = match matrix.get(i, j) {
                Some(d) => d,
                None => {
                    unreachable += 1;
                    penalty
                }
            };
            lp.add_column(w / scale * d, 0.0, 1.0);
        }
    }
    if unreachable > 0 {
        debug!(pairs = unreachable, penalty, "unreachable pairs priced at penalty");
    }

    // Σ x_j = K
    lp.add_eq_row(
        problem.facility_count as f64,
        (0..n_j).map(|j| (layout.x(j), 1.0)).collect(),
    );
    // Σ_j y_ij = 1
    for i in 0..n_i {
        lp.add_eq_row(1.0, (0..n_j).map(|j| (layout.y(i, j), 1.0)).collect());
    }
    // y_ij ≤ x_j
    for i in 0..n_i {
        for j in 0..n_j {
            lp.add_le_row(0.0, vec![(layout.y(i, j), 1.0), (layout.x(j), -1.0)]);
        }
    }

    (lp, layout)
}
