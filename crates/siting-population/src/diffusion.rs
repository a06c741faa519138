//! Mass-conserving population diffusion over the road graph.
//!
//! # One iteration
//!
//! Every node `v` keeps `r · p_v` and hands `(1 − r) · p_v / deg(v)` to each
//! of its neighbours.  An isolated node keeps its whole mass.  Because the
//! graph is undirected this scatter can be written as a gather:
//!
//! ```text
//! next[v] = keep(v) + Σ_{u ∈ N(v)} (1 − r) · cur[u] / deg(u)
//! keep(v) = cur[v]        if deg(v) = 0
//!         = r · cur[v]    otherwise
//! ```
//!
//! The gather reads only the frozen `cur` buffer and writes only `next[v]`,
//! so with the `parallel` feature nodes are updated concurrently.  Buffers
//! are swapped between iterations.
//!
//! # Finalization
//!
//! Values are rounded half-to-even and the rounding residual is applied to
//! the single most-populated node, making the integer total equal the
//! original total exactly.

use tracing::{debug, info};

use siting_core::{NodeId, SitingConfig};
use siting_network::RoadNetwork;

use crate::{FinalPopulation, PopulationDistribution, PopulationError, PopulationResult};

/// Relative tolerance on total mass between iterations.
const MASS_TOLERANCE: f64 = 1e-9;

// ── Diffuser ──────────────────────────────────────────────────────────────────

/// Diffusion parameters: iteration count `N` and retention factor `r`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diffuser {
    iterations: u32,
    retention:  f64,
}

impl Diffuser {
    /// # Errors
    ///
    /// [`PopulationError::InvalidRetention`] unless `0 < retention < 1`.
    pub fn new(iterations: u32, retention: f64) -> PopulationResult<Self> {
        if !(retention > 0.0 && retention < 1.0) {
            return Err(PopulationError::InvalidRetention(retention));
        }
        Ok(Self { iterations, retention })
    }

    pub fn from_config(config: &SitingConfig) -> PopulationResult<Self> {
        Self::new(config.diffusion_iterations, config.diffusion_retention)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn retention(&self) -> f64 {
        self.retention
    }

    /// Run `N` iterations and return the real-valued result.
    ///
    /// # Errors
    ///
    /// - [`PopulationError::SizeMismatch`] if `initial` was built for a
    ///   different network.
    /// - [`PopulationError::Conservation`] if total mass drifts beyond
    ///   tolerance.
    pub fn diffuse(
        &self,
        network: &RoadNetwork,
        initial: &PopulationDistribution,
    ) -> PopulationResult<PopulationDistribution> {
        let n = network.node_count();
        if initial.len() != n {
            return Err(PopulationError::SizeMismatch { expected: n, got: initial.len() });
        }

        let expected = initial.total();
        let mut cur  = initial.values().to_vec();
        let mut next = vec![0.0; n];

        for iteration in 1..=self.iterations {
            self.step(network, &cur, &mut next);
            std::mem::swap(&mut cur, &mut next);

            let actual: f64 = cur.iter().sum();
            if (actual - expected).abs() > MASS_TOLERANCE * expected.abs().max(1.0) {
                return Err(PopulationError::Conservation { iteration, expected, actual });
            }
            debug!(iteration, total = actual, "diffusion iteration done");
        }

        Ok(PopulationDistribution::from_raw(cur))
    }

    /// [`diffuse`](Self::diffuse) followed by [`finalize`].
    pub fn diffuse_and_finalize(
        &self,
        network: &RoadNetwork,
        initial: &PopulationDistribution,
    ) -> PopulationResult<FinalPopulation> {
        let smoothed = self.diffuse(network, initial)?;
        let result = finalize(&smoothed, initial.total());
        info!(
            iterations = self.iterations,
            retention  = self.retention,
            total      = result.total(),
            "population diffused"
        );
        Ok(result)
    }

    /// One gather pass: read `cur`, overwrite every entry of `next`.
    fn step(&self, network: &RoadNetwork, cur: &[f64], next: &mut [f64]) {
        let r = self.retention;
        let gather = |v: usize| -> f64 {
            let node = NodeId(v as u32);
            let keep = if network.degree(node) == 0 { cur[v] } else { r * cur[v] };
            network.neighbors(node).fold(keep, |acc, (u, _)| {
                let p = cur[u.index()];
                if p > 0.0 {
                    acc + (1.0 - r) * p / network.degree(u) as f64
                } else {
                    acc
                }
            })
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            next.par_iter_mut().enumerate().for_each(|(v, slot)| *slot = gather(v));
        }

        #[cfg(not(feature = "parallel"))]
        for (v, slot) in next.iter_mut().enumerate() {
            *slot = gather(v);
        }
    }
}

// ── Finalization ──────────────────────────────────────────────────────────────

/// Round `dist` to integers whose sum equals `original_total` (itself rounded
/// half-to-even) exactly.
///
/// The residual goes to the node with the largest rounded population, lowest
/// `NodeId` on ties.  A negative residual larger than that node's count keeps
/// it at zero and carries the remainder to the next-largest node, so no count
/// ever goes negative.
pub fn finalize(dist: &PopulationDistribution, original_total: f64) -> FinalPopulation {
    let target = original_total.round_ties_even() as i64;
    let mut rounded: Vec<i64> = dist
        .values()
        .iter()
        .map(|p| p.round_ties_even() as i64)
        .collect();

    let mut residual = target - rounded.iter().sum::<i64>();
    if residual != 0 {
        debug!(residual, "correcting rounding residual");

        // Largest first, lowest id on ties.
        let mut order: Vec<usize> = (0..rounded.len()).collect();
        order.sort_by(|&a, &b| rounded[b].cmp(&rounded[a]).then(a.cmp(&b)));

        if residual > 0 {
            if let Some(&top) = order.first() {
                rounded[top] += residual;
            }
        } else {
            for idx in order {
                let take = (-residual).min(rounded[idx]);
                rounded[idx] -= take;
                residual += take;
                if residual == 0 {
                    break;
                }
            }
        }
    }

    FinalPopulation::from_counts(rounded.into_iter().map(|c| c.max(0) as u64).collect())
}
