//! Run configuration.
//!
//! The core has no flags of its own.  The application fills a
//! [`SitingConfig`] (programmatically or from a TOML/JSON file when the
//! `serde` feature is on) and hands it to the pipeline.

use crate::{CoreError, CoreResult};

// ── CandidatePolicy ───────────────────────────────────────────────────────────

/// How the demand set `I` and the candidate set `J` are drawn from the node
/// population.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CandidatePolicy {
    /// `I = J = {nodes with population > 0}`.  Small LP, fast to solve.
    Simplified,

    /// `I` = every node, `J = {nodes with population >= min_population}`.
    General { min_population: f64 },
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        CandidatePolicy::General { min_population: 200.0 }
    }
}

// ── SitingConfig ──────────────────────────────────────────────────────────────

/// Top-level pipeline configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SitingConfig {
    /// Number of facilities `K` to site.  Must be at least 1.
    pub facility_count: usize,

    /// Demand/candidate set selection.
    pub candidate_policy: CandidatePolicy,

    /// Diffusion iteration count `N`.  0 leaves the census signal as-is.
    pub diffusion_iterations: u32,

    /// Fraction `r` of a node's population kept in place per iteration.
    /// Must lie strictly inside (0, 1).
    pub diffusion_retention: f64,

    /// Wall-clock budget for the LP backend.  `None` means no limit.
    pub solver_time_limit_secs: Option<f64>,

    /// Worker thread count for the parallel stages.  `None` uses all
    /// logical cores.  Ignored without the `parallel` feature.
    pub num_threads: Option<usize>,
}

impl Default for SitingConfig {
    fn default() -> Self {
        Self {
            facility_count:         6,
            candidate_policy:       CandidatePolicy::default(),
            diffusion_iterations:   3,
            diffusion_retention:    0.4,
            solver_time_limit_secs: None,
            num_threads:            None,
        }
    }
}

impl SitingConfig {
    /// Check every field for values the stages would reject later.
    pub fn validate(&self) -> CoreResult<()> {
        if self.facility_count == 0 {
            return Err(CoreError::Config("facility_count must be at least 1".into()));
        }
        let r = self.diffusion_retention;
        if !(r > 0.0 && r < 1.0) {
            return Err(CoreError::Config(format!(
                "diffusion_retention must lie in (0, 1), got {r}"
            )));
        }
        if let CandidatePolicy::General { min_population } = self.candidate_policy {
            if !min_population.is_finite() || min_population < 0.0 {
                return Err(CoreError::Config(format!(
                    "min_population must be a finite non-negative number, got {min_population}"
                )));
            }
        }
        if let Some(secs) = self.solver_time_limit_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(CoreError::Config(format!(
                    "solver_time_limit_secs must be positive, got {secs}"
                )));
            }
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// The solver time limit as a `Duration`, if one is set.
    pub fn solver_time_limit(&self) -> Option<std::time::Duration> {
        self.solver_time_limit_secs.map(std::time::Duration::from_secs_f64)
    }
}
