//! `siting-population`: population signals anchored on road nodes.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`distribution`] | `PopulationDistribution` (real), `FinalPopulation` (integer), `NodeWeights` |
//! | [`diffusion`]    | `Diffuser`, `finalize`                                   |
//! | [`join`]         | `CensusTract`, `aggregate_by_nearest_node`               |
//! | [`error`]        | `PopulationError`, `PopulationResult<T>`                 |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs each diffusion iteration's per-node gather on Rayon. |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod diffusion;
pub mod distribution;
pub mod error;
pub mod join;

#[cfg(test)]
mod tests;

pub use diffusion::{Diffuser, finalize};
pub use distribution::{FinalPopulation, NodeWeights, PopulationDistribution};
pub use error::{PopulationError, PopulationResult};
pub use join::{CensusTract, aggregate_by_nearest_node};
