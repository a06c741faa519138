//! Dense per-node population arrays.
//!
//! Both types are indexed by `NodeId` and always cover every node of the
//! network they were built for.  A node absent from the collaborator's sparse
//! input simply holds zero.

use siting_core::NodeId;
use siting_network::RoadNetwork;

use crate::{PopulationError, PopulationResult};

// ── NodeWeights ───────────────────────────────────────────────────────────────

/// Read access to a per-node demand weight.
///
/// Implemented by both the real-valued and the finalized distribution so the
/// solver can be fed either the raw census signal or the smoothed one.
pub trait NodeWeights {
    /// Number of nodes covered.
    fn node_count(&self) -> usize;

    /// Population mass at `node` (0 for out-of-range ids).
    fn weight(&self, node: NodeId) -> f64;
}

// ── PopulationDistribution ────────────────────────────────────────────────────

/// Real-valued population per node.  Pre-finalization form.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationDistribution {
    values: Vec<f64>,
}

impl PopulationDistribution {
    /// All-zero distribution over `node_count` nodes.
    pub fn zeros(node_count: usize) -> Self {
        Self { values: vec![0.0; node_count] }
    }

    /// Build a dense distribution from a sparse `node → population` mapping.
    ///
    /// Populations of repeated nodes are summed.
    ///
    /// # Errors
    ///
    /// - [`PopulationError::NodeNotFound`] for ids outside `network`.
    /// - [`PopulationError::InvalidPopulation`] for negative or non-finite
    ///   values.
    pub fn from_sparse<I>(network: &RoadNetwork, pairs: I) -> PopulationResult<Self>
    where
        I: IntoIterator<Item = (NodeId, f64)>,
    {
        let mut dist = Self::zeros(network.node_count());
        for (node, value) in pairs {
            if !network.contains(node) {
                return Err(PopulationError::NodeNotFound(node));
            }
            if !(value.is_finite() && value >= 0.0) {
                return Err(PopulationError::InvalidPopulation { node, value });
            }
            dist.values[node.index()] += value;
        }
        Ok(dist)
    }

    /// Wrap an already dense vector.
    ///
    /// # Errors
    ///
    /// [`PopulationError::InvalidPopulation`] for negative or non-finite
    /// entries.
    pub fn from_dense(values: Vec<f64>) -> PopulationResult<Self> {
        if let Some((i, &value)) = values
            .iter()
            .enumerate()
            .find(|&(_, v)| !(v.is_finite() && *v >= 0.0))
        {
            return Err(PopulationError::InvalidPopulation { node: NodeId(i as u32), value });
        }
        Ok(Self { values })
    }

    pub(crate) fn from_raw(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> f64 {
        self.values.get(node.index()).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sum over every node.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// `(node, population)` for every node with population > 0.
    pub fn nonzero(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.0)
            .map(|(i, &p)| (NodeId(i as u32), p))
    }
}

impl NodeWeights for PopulationDistribution {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn weight(&self, node: NodeId) -> f64 {
        self.get(node)
    }
}

// ── FinalPopulation ───────────────────────────────────────────────────────────

/// Integer population per node, produced by [`finalize`](crate::finalize).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalPopulation {
    counts: Vec<u64>,
}

impl FinalPopulation {
    /// Wrap per-node counts, e.g. when restoring a persisted snapshot.
    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> u64 {
        self.counts.get(node.index()).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(node, count)` for every node with a positive count.
    pub fn nonzero(&self) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (NodeId(i as u32), c))
    }

    /// Back to real-valued form, e.g. to diffuse a finalized signal again.
    pub fn to_distribution(&self) -> PopulationDistribution {
        PopulationDistribution::from_raw(self.counts.iter().map(|&c| c as f64).collect())
    }
}

impl NodeWeights for FinalPopulation {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn weight(&self, node: NodeId) -> f64 {
        self.get(node) as f64
    }
}
