//! `siting-network`: road network model and all-pairs shortest distances.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (undirected CSR + R-tree), `RoadNetworkBuilder` |
//! | [`matrix`]  | `DistanceMatrix`, per-source Dijkstra                       |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Computes matrix rows on Rayon's thread pool.              |
//! | `serde`    | Derives `Serialize`/`Deserialize` on core types.          |

pub mod error;
pub mod matrix;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use matrix::{DistanceMatrix, UNREACHABLE};
pub use network::{RoadNetwork, RoadNetworkBuilder};
