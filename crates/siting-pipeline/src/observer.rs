//! Stage observer trait for progress reporting.

use std::fmt;
use std::time::Duration;

/// One stage of [`Pipeline::run`][crate::Pipeline::run].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    DistanceMatrix,
    Diffusion,
    Optimization,
    Assembly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::DistanceMatrix => "distance matrix",
            Stage::Diffusion      => "diffusion",
            Stage::Optimization   => "optimization",
            Stage::Assembly       => "assembly",
        })
    }
}

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] around each
/// stage.
///
/// All methods have default no-op implementations.  Under the `parallel`
/// feature the distance-matrix and diffusion stages overlap: both start
/// callbacks fire before either end callback.  A stage skipped because its
/// result is cached fires neither.
///
/// # Example: stage timer
///
/// ```rust,ignore
/// struct Timer;
///
/// impl PipelineObserver for Timer {
///     fn on_stage_end(&mut self, stage: Stage, elapsed: Duration) {
///         println!("{stage}: {elapsed:?}");
///     }
/// }
/// ```
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: Stage) {}

    /// Called after a stage succeeds.  Not called for a failing stage.
    fn on_stage_end(&mut self, _stage: Stage, _elapsed: Duration) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
