//! Demand and candidate sets for one facility-location instance.

use siting_core::{CandidatePolicy, NodeId};
use siting_population::NodeWeights;

/// One facility-location instance, independent of the distance source.
///
/// `demand` pairs each demand node with its population weight; `candidates`
/// lists the nodes allowed to host a facility.  Both are kept in ascending
/// `NodeId` order when built by [`from_population`](Self::from_population).
#[derive(Clone, Debug, PartialEq)]
pub struct FacilityProblem {
    pub demand:         Vec<(NodeId, f64)>,
    pub candidates:     Vec<NodeId>,
    pub facility_count: usize,
}

impl FacilityProblem {
    pub fn new(demand: Vec<(NodeId, f64)>, candidates: Vec<NodeId>, facility_count: usize) -> Self {
        Self { demand, candidates, facility_count }
    }

    /// Derive demand and candidate sets from a per-node population.
    ///
    /// - [`CandidatePolicy::Simplified`]: every populated node (> 0) is both a
    ///   demand node and a candidate.
    /// - [`CandidatePolicy::General`]: every node is a demand node; only nodes
    ///   holding at least `min_population` are candidates.
    pub fn from_population<P: NodeWeights + ?Sized>(
        population:     &P,
        policy:         CandidatePolicy,
        facility_count: usize,
    ) -> Self {
        let weights = (0..population.node_count()).map(|i| {
            let node = NodeId(i as u32);
            (node, population.weight(node))
        });

        match policy {
            CandidatePolicy::Simplified => {
                let demand: Vec<(NodeId, f64)> = weights.filter(|&(_, w)| w > 0.0).collect();
                let candidates = demand.iter().map(|&(n, _)| n).collect();
                Self { demand, candidates, facility_count }
            }
            CandidatePolicy::General { min_population } => {
                let demand: Vec<(NodeId, f64)> = weights.collect();
                let candidates = demand
                    .iter()
                    .filter(|&&(_, w)| w >= min_population)
                    .map(|&(n, _)| n)
                    .collect();
                Self { demand, candidates, facility_count }
            }
        }
    }

    pub fn demand_count(&self) -> usize {
        self.demand.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Sum of demand weights.
    pub fn total_demand(&self) -> f64 {
        self.demand.iter().map(|&(_, w)| w).sum()
    }
}
