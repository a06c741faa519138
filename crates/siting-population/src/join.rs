//! Census-to-node join.
//!
//! Census tracts arrive as polygons with a headcount.  The geometry work
//! (reprojection, centroid) happens upstream; this module takes the
//! centroids, snaps each to its nearest road node and sums the headcounts of
//! tracts that land on the same node.

use rustc_hash::FxHashMap;
use tracing::debug;

use siting_core::{NodeId, Point};
use siting_network::RoadNetwork;

use crate::{PopulationError, PopulationResult};

/// One census tract reduced to its centroid and headcount.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CensusTract {
    /// Centroid in the network's projected CRS.
    pub centroid: Point,
    pub population: f64,
}

/// Sum tract populations onto their nearest road nodes.
///
/// Returns a sparse map holding only nodes that received at least one tract;
/// feed it to [`PopulationDistribution::from_sparse`](crate::PopulationDistribution::from_sparse).
///
/// # Errors
///
/// - [`PopulationError::EmptyNetwork`] if there are tracts but no nodes.
/// - [`PopulationError::InvalidTract`] for a negative or non-finite headcount.
pub fn aggregate_by_nearest_node(
    network: &RoadNetwork,
    tracts:  &[CensusTract],
) -> PopulationResult<FxHashMap<NodeId, f64>> {
    let mut by_node: FxHashMap<NodeId, f64> = FxHashMap::default();

    for (index, tract) in tracts.iter().enumerate() {
        let value = tract.population;
        if !(value.is_finite() && value >= 0.0) {
            return Err(PopulationError::InvalidTract { index, value });
        }
        let node = network
            .snap_to_node(tract.centroid)
            .ok_or(PopulationError::EmptyNetwork)?;
        *by_node.entry(node).or_insert(0.0) += value;
    }

    debug!(tracts = tracts.len(), nodes = by_node.len(), "census tracts joined to nodes");
    Ok(by_node)
}
