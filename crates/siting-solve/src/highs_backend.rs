//! HiGHS backend.
//!
//! Maps a [`LinearProgram`] onto the `highs` crate's row-oriented problem,
//! solves it with logging silenced, and folds HiGHS's model status into
//! [`LpStatus`].

use highs::{Col, HighsModelStatus, RowProblem, Sense};
use tracing::debug;

use crate::lp::{LinearProgram, LpBackend, LpOutcome, LpStatus, SolveLimits};

/// Solves programs with the HiGHS dual simplex / IPM solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighsBackend;

impl LpBackend for HighsBackend {
    fn name(&self) -> &str {
        "highs"
    }

    fn solve(&self, program: &LinearProgram, limits: &SolveLimits) -> LpOutcome {
        let mut pb = RowProblem::default();

        let cols: Vec<Col> = program
            .columns()
            .iter()
            .map(|c| pb.add_column(c.cost, c.lower..=c.upper))
            .collect();

        for row in program.rows() {
            let terms: Vec<(Col, f64)> = row.terms.iter().map(|&(c, a)| (cols[c.0], a)).collect();
            pb.add_row(row.lower..=row.upper, terms);
        }

        let mut model = pb.optimise(Sense::Minimise);
        model.make_quiet();
        if let Some(limit) = limits.time_limit {
            model.set_option("time_limit", limit.as_secs_f64());
        }

        let solved = match model.try_solve() {
            Ok(solved) => solved,
            Err(status) => {
                return LpOutcome::failed(LpStatus::NotSolved(format!("{status:?}")));
            }
        };

        let model_status = solved.status();
        debug!(status = ?model_status, "HiGHS finished");

        let status = match model_status {
            HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => LpStatus::Optimal,
            HighsModelStatus::Infeasible => LpStatus::Infeasible,
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                LpStatus::Unbounded
            }
            HighsModelStatus::ReachedTimeLimit => LpStatus::TimedOut,
            other => LpStatus::NotSolved(format!("{other:?}")),
        };
        if status != LpStatus::Optimal {
            return LpOutcome::failed(status);
        }

        let values = solved.get_solution().columns().to_vec();
        LpOutcome {
            status,
            objective: Some(program.objective_of(&values)),
            values,
        }
    }
}
