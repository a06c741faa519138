//! The `Pipeline` struct and its stage sequence.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use siting_core::SitingConfig;
use siting_network::{DistanceMatrix, RoadNetwork};
use siting_output::RankedTable;
use siting_population::{Diffuser, FinalPopulation, PopulationDistribution};
use siting_solve::{FacilityLocationSolver, FacilityProblem, LpBackend, OptimizationResult};

use crate::{PipelineError, PipelineObserver, PipelineResult, Stage};

/// Everything one run produces.
#[derive(Clone, Debug)]
pub struct SitingOutcome {
    /// Diffused, finalized population that fed the solver.
    pub population: FinalPopulation,
    pub result:     OptimizationResult,
    /// Candidates ranked by opening weight; `table.selected()` are the sites.
    pub table:      RankedTable,
}

/// The facility-siting runner.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
#[derive(Debug)]
pub struct Pipeline<B: LpBackend> {
    pub(crate) config:   SitingConfig,
    pub(crate) network:  RoadNetwork,
    pub(crate) initial:  PopulationDistribution,
    pub(crate) diffuser: Diffuser,
    pub(crate) solver:   FacilityLocationSolver<B>,
    /// Filled by the first run that gets past stage ① unless supplied up front.
    pub(crate) matrix:   Option<DistanceMatrix>,
    /// Dedicated pool when `num_threads` is set; Rayon's global pool otherwise.
    #[cfg(feature = "parallel")]
    pub(crate) pool:     Option<rayon::ThreadPool>,
}

impl<B: LpBackend> Pipeline<B> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every stage and return the ranked result.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    ///
    /// # Errors
    ///
    /// The first failing stage's error.  In particular
    /// `PipelineError::Solve(SolveError::InsufficientCandidates { .. })` is
    /// recoverable: lower `K` with [`set_facility_count`](Self::set_facility_count)
    /// and run again.
    pub fn run<O: PipelineObserver>(&mut self, observer: &mut O) -> PipelineResult<SitingOutcome> {
        let started = Instant::now();

        let (matrix, population) = match self.matrix.take() {
            Some(cached) => {
                debug!(nodes = cached.len(), "reusing cached distance matrix");
                let population = timed(observer, Stage::Diffusion, || {
                    self.diffuser.diffuse_and_finalize(&self.network, &self.initial)
                });
                (cached, population)
            }
            None => self.first_stages(observer)?,
        };
        let matrix = &*self.matrix.insert(matrix);
        let population = population?;

        let k = self.config.facility_count;
        let result = timed(observer, Stage::Optimization, || {
            let problem =
                FacilityProblem::from_population(&population, self.config.candidate_policy, k);
            self.solver.solve(&problem, matrix)
        })?;

        let table = timed(observer, Stage::Assembly, || {
            RankedTable::assemble(&result, &self.network, k)
        })?;

        info!(
            elapsed = ?started.elapsed(),
            sites   = ?table.selected().iter().map(|s| s.node.0).collect::<Vec<_>>(),
            "siting pipeline finished"
        );
        Ok(SitingOutcome { population, result, table })
    }

    /// Change `K` for subsequent runs.  The cached matrix is kept.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Config`] if `facility_count` is zero.
    pub fn set_facility_count(&mut self, facility_count: usize) -> PipelineResult<()> {
        let mut config = self.config.clone();
        config.facility_count = facility_count;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SitingConfig {
        &self.config
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// The distance matrix, once supplied or computed.
    pub fn distance_matrix(&self) -> Option<&DistanceMatrix> {
        self.matrix.as_ref()
    }

    /// Take the distance matrix out, e.g. to persist it.  The next run
    /// recomputes it.
    pub fn take_distance_matrix(&mut self) -> Option<DistanceMatrix> {
        self.matrix.take()
    }

    // ── Stages ① and ② ────────────────────────────────────────────────────

    /// Distance matrix and diffusion, one after the other.
    ///
    /// The outer error is the matrix stage's; the inner result is the
    /// diffusion stage's, kept apart so a computed matrix is cached either way.
    #[cfg(not(feature = "parallel"))]
    fn first_stages<O: PipelineObserver>(
        &self,
        observer: &mut O,
    ) -> PipelineResult<(DistanceMatrix, PipelineResult<FinalPopulation>)> {
        let matrix = timed(observer, Stage::DistanceMatrix, || {
            DistanceMatrix::compute(&self.network)
        })?;
        let population = timed(observer, Stage::Diffusion, || {
            self.diffuser.diffuse_and_finalize(&self.network, &self.initial)
        });
        Ok((matrix, population))
    }

    /// Distance matrix and diffusion side by side on the Rayon pool.
    #[cfg(feature = "parallel")]
    fn first_stages<O: PipelineObserver>(
        &self,
        observer: &mut O,
    ) -> PipelineResult<(DistanceMatrix, PipelineResult<FinalPopulation>)> {
        use siting_network::NetworkResult;
        use siting_population::PopulationResult;

        let (network, initial, diffuser) = (&self.network, &self.initial, self.diffuser);

        let work = || {
            rayon::join(
                || measure(|| DistanceMatrix::compute(network)),
                || measure(|| diffuser.diffuse_and_finalize(network, initial)),
            )
        };

        observer.on_stage_start(Stage::DistanceMatrix);
        observer.on_stage_start(Stage::Diffusion);
        let ((matrix, t_matrix), (population, t_diffusion)): (
            (NetworkResult<DistanceMatrix>, Duration),
            (PopulationResult<FinalPopulation>, Duration),
        ) = match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        };

        let matrix = matrix?;
        debug!(stage = %Stage::DistanceMatrix, elapsed = ?t_matrix, "stage done");
        observer.on_stage_end(Stage::DistanceMatrix, t_matrix);
        if population.is_ok() {
            debug!(stage = %Stage::Diffusion, elapsed = ?t_diffusion, "stage done");
            observer.on_stage_end(Stage::Diffusion, t_diffusion);
        }
        Ok((matrix, population.map_err(PipelineError::from)))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Run `f` between the observer's start and end callbacks.
fn timed<O, T, E, F>(observer: &mut O, stage: Stage, f: F) -> PipelineResult<T>
where
    O: PipelineObserver,
    E: Into<PipelineError>,
    F: FnOnce() -> Result<T, E>,
{
    observer.on_stage_start(stage);
    let (result, elapsed) = measure(f);
    let value = match result {
        Ok(value) => value,
        Err(e) => return Err(e.into()),
    };
    debug!(%stage, ?elapsed, "stage done");
    observer.on_stage_end(stage, elapsed);
    Ok(value)
}

fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let started = Instant::now();
    let out = f();
    (out, started.elapsed())
}
