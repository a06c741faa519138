use thiserror::Error;

use siting_core::CoreError;
use siting_network::NetworkError;
use siting_output::OutputError;
use siting_population::PopulationError;
use siting_solve::SolveError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("distance matrix covers {got} nodes but the network has {expected}")]
    MatrixSize { expected: usize, got: usize },

    #[error("distance matrix stage: {0}")]
    Network(#[from] NetworkError),

    #[error("diffusion stage: {0}")]
    Population(#[from] PopulationError),

    #[error("optimization stage: {0}")]
    Solve(#[from] SolveError),

    #[error("assembly stage: {0}")]
    Output(#[from] OutputError),

    #[cfg(feature = "parallel")]
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
