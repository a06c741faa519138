//! `siting-pipeline`: stage orchestrator for the facility-siting pipeline.
//!
//! # Stages
//!
//! ```text
//! ① Distance matrix : all-pairs shortest paths over the road network
//! ② Diffusion       : smooth the census population, then finalize
//!                      (① and ② are independent; concurrent with `parallel`)
//! ③ Optimization    : facility-location LP on the finalized population
//! ④ Assembly        : rank candidates by opening weight, pick the top K
//! ```
//!
//! The distance matrix is cached inside the [`Pipeline`] after the first
//! run, so a caller that lowers `K` after an `InsufficientCandidates` error
//! can resubmit without recomputing it.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Stages ① and ② run concurrently, each internally parallel. |
//! | `highs`    | *(default)* Re-exports `HighsBackend`.                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use siting_pipeline::{HighsBackend, NoopObserver, PipelineBuilder};
//!
//! let mut pipeline = PipelineBuilder::new(config, network, population, HighsBackend)
//!     .build()?;
//! let outcome = pipeline.run(&mut NoopObserver)?;
//! for site in outcome.table.selected() {
//!     println!("{} {:.3}", site.node, site.weight);
//! }
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pipeline;


pub use builder::PipelineBuilder;
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoopObserver, PipelineObserver, Stage};
pub use pipeline::{Pipeline, SitingOutcome};

#[cfg(feature = "highs")]
pub use siting_solve::HighsBackend;
