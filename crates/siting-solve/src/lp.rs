//! Backend-neutral linear program and the backend capability trait.
//!
//! A [`LinearProgram`] is a minimisation problem in row form: bounded
//! columns with objective coefficients, and rows `lower ≤ Σ a·x ≤ upper`
//! over sparse terms.  Every column is continuous.

use std::fmt;
use std::time::Duration;

// ── Program ───────────────────────────────────────────────────────────────────

/// Index of a column in a [`LinearProgram`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub usize);

/// One decision variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub cost:  f64,
    pub lower: f64,
    pub upper: f64,
}

/// One constraint row.  Use infinite bounds for one-sided rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub lower: f64,
    pub upper: f64,
    pub terms: Vec<(ColumnId, f64)>,
}

/// Minimise `Σ cost·x` subject to the rows and column bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearProgram {
    columns: Vec<Column>,
    rows:    Vec<Row>,
}

impl LinearProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(columns: usize, rows: usize) -> Self {
        Self {
            columns: Vec::with_capacity(columns),
            rows:    Vec::with_capacity(rows),
        }
    }

    pub fn add_column(&mut self, cost: f64, lower: f64, upper: f64) -> ColumnId {
        let id = ColumnId(self.columns.len());
        self.columns.push(Column { cost, lower, upper });
        id
    }

    pub fn add_row(&mut self, lower: f64, upper: f64, terms: Vec<(ColumnId, f64)>) {
        self.rows.push(Row { lower, upper, terms });
    }

    /// `Σ terms == value`.
    pub fn add_eq_row(&mut self, value: f64, terms: Vec<(ColumnId, f64)>) {
        self.add_row(value, value, terms);
    }

    /// `Σ terms <= upper`.
    pub fn add_le_row(&mut self, upper: f64, terms: Vec<(ColumnId, f64)>) {
        self.add_row(f64::NEG_INFINITY, upper, terms);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Objective value of `values` (one entry per column).
    pub fn objective_of(&self, values: &[f64]) -> f64 {
        self.columns
            .iter()
            .zip(values)
            .map(|(c, v)| c.cost * v)
            .sum()
    }
}

// ── Backend capability ────────────────────────────────────────────────────────

/// Terminal status reported by a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The time limit in [`SolveLimits`] was reached.
    TimedOut,
    /// Anything else, with the backend's own description.
    NotSolved(String),
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LpStatus::Optimal      => f.write_str("optimal"),
            LpStatus::Infeasible   => f.write_str("infeasible"),
            LpStatus::Unbounded    => f.write_str("unbounded"),
            LpStatus::TimedOut     => f.write_str("timed out"),
            LpStatus::NotSolved(s) => write!(f, "not solved ({s})"),
        }
    }
}

/// What a backend hands back.
#[derive(Clone, Debug, PartialEq)]
pub struct LpOutcome {
    pub status: LpStatus,
    /// One value per column.  Only meaningful when `status` is `Optimal`.
    pub values: Vec<f64>,
    /// Objective value, if the backend reports one.
    pub objective: Option<f64>,
}

impl LpOutcome {
    /// An outcome carrying only a non-optimal status.
    pub fn failed(status: LpStatus) -> Self {
        Self { status, values: Vec::new(), objective: None }
    }
}

/// Resource limits applied to a single backend call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SolveLimits {
    /// Wall-clock budget.  `None` means unlimited.
    pub time_limit: Option<Duration>,
}

/// Pluggable linear-programming backend.
///
/// # Contract
///
/// `solve` is a single blocking call.  It must honour
/// `limits.time_limit` and report [`LpStatus::TimedOut`] rather than a
/// partial solution when the budget runs out.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so the pipeline can hold them
/// across Rayon-parallel stages.
pub trait LpBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn solve(&self, program: &LinearProgram, limits: &SolveLimits) -> LpOutcome;
}

impl<B: LpBackend + ?Sized> LpBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, program: &LinearProgram, limits: &SolveLimits) -> LpOutcome {
        (**self).solve(program, limits)
    }
}
