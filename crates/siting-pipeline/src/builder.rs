//! Fluent builder for constructing a [`Pipeline`].

use siting_core::{NodeId, SitingConfig};
use siting_network::{DistanceMatrix, RoadNetwork};
use siting_population::{Diffuser, PopulationDistribution};
use siting_solve::{FacilityLocationSolver, LpBackend};

use crate::{Pipeline, PipelineError, PipelineResult};

/// Fluent builder for [`Pipeline<B>`].
///
/// # Required inputs
///
/// - [`SitingConfig`]: `K`, candidate policy, diffusion parameters, …
/// - [`RoadNetwork`]: the static road graph
/// - sparse population: `(node, headcount)` pairs from the census join
/// - `B: LpBackend`: e.g. `HighsBackend`
///
/// # Optional inputs
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.distance_matrix(m)`   | Computed on the first `run`      |
///
/// # Example
///
/// ```rust,ignore
/// let mut pipeline = PipelineBuilder::new(config, network, population, HighsBackend)
///     .distance_matrix(load_matrix(path)?)
///     .build()?;
/// ```
pub struct PipelineBuilder<B: LpBackend> {
    config:     SitingConfig,
    network:    RoadNetwork,
    population: Vec<(NodeId, f64)>,
    backend:    B,
    matrix:     Option<DistanceMatrix>,
}

impl<B: LpBackend> PipelineBuilder<B> {
    pub fn new<I>(config: SitingConfig, network: RoadNetwork, population: I, backend: B) -> Self
    where
        I: IntoIterator<Item = (NodeId, f64)>,
    {
        Self {
            config,
            network,
            population: population.into_iter().collect(),
            backend,
            matrix: None,
        }
    }

    /// Supply a previously computed distance matrix, skipping stage ①.
    ///
    /// Its size is checked against the network in [`build`](Self::build).
    pub fn distance_matrix(mut self, matrix: DistanceMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Validate configuration and inputs and return a ready-to-run
    /// [`Pipeline`].
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Config`] for an invalid [`SitingConfig`].
    /// - [`PipelineError::Population`] for unknown nodes or invalid headcounts.
    /// - [`PipelineError::MatrixSize`] if a supplied matrix does not match the
    ///   network.
    /// - `PipelineError::ThreadPool` (feature `parallel`) if the dedicated
    ///   pool for `num_threads` cannot be started.
    pub fn build(self) -> PipelineResult<Pipeline<B>> {
        self.config.validate()?;

        let initial = PopulationDistribution::from_sparse(&self.network, self.population)?;
        let diffuser = Diffuser::from_config(&self.config)?;

        if let Some(m) = &self.matrix {
            if m.len() != self.network.node_count() {
                return Err(PipelineError::MatrixSize {
                    expected: self.network.node_count(),
                    got:      m.len(),
                });
            }
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };

        let solver = FacilityLocationSolver::from_config(self.backend, &self.config);

        Ok(Pipeline {
            config:  self.config,
            network: self.network,
            initial,
            diffuser,
            solver,
            matrix:  self.matrix,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
