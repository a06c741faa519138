//! `siting-core`: foundational types for the facility-siting pipeline.
//!
//! This crate is a dependency of every other `siting-*` crate.  It has no
//! `siting-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `NodeId`                                              |
//! | [`geo`]     | `Point` (projected planar coordinates)                |
//! | [`config`]  | `SitingConfig`, `CandidatePolicy`                     |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CandidatePolicy, SitingConfig};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::NodeId;
