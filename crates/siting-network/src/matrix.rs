//! All-pairs shortest-distance matrix.
//!
//! # Algorithm
//!
//! One Dijkstra expansion per source node over the undirected CSR graph.
//! Each expansion owns a private binary heap and writes only its own matrix
//! row, so with the `parallel` feature rows are filled concurrently by
//! Rayon with no shared mutable state.  Total cost is
//! O(V · (E + V) · log V); this is the dominant stage of the pipeline.
//!
//! # Symmetry
//!
//! Floating-point sums along the same path can differ in the last bit
//! depending on traversal direction.  After assembly every pair is set to
//! `min(d(i,j), d(j,i))`, so `raw(i, j) == raw(j, i)` holds exactly.
//!
//! # Unreachable pairs
//!
//! Disconnected pairs hold [`UNREACHABLE`] (`f64::INFINITY`).  This is not
//! an error; the solver prices such pairs as effectively infinite.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use tracing::{debug, info};

use siting_core::NodeId;

use crate::network::RoadNetwork;
use crate::{NetworkError, NetworkResult};

/// Sentinel distance for pairs with no connecting path.
pub const UNREACHABLE: f64 = f64::INFINITY;

// ── DistanceMatrix ────────────────────────────────────────────────────────────

/// Dense `n × n` matrix of shortest travel distances, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    n:    usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute shortest distances between every pair of nodes in `network`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidWeight`] if any edge length is negative, infinite or NaN.
    /// Nothing is computed in that case.
    pub fn compute(network: &RoadNetwork) -> NetworkResult<Self> {
        if let Some((from, to, weight)) = network.find_invalid_length() {
            return Err(NetworkError::InvalidWeight { from, to, weight });
        }

        let n = network.node_count();
        let started = Instant::now();
        debug!(nodes = n, edges = network.edge_count(), "computing all-pairs distances");

        let mut data = vec![UNREACHABLE; n * n];
        if n > 0 {
            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                data.par_chunks_mut(n)
                    .enumerate()
                    .for_each(|(s, row)| shortest_from(network, NodeId(s as u32), row));
            }

            #[cfg(not(feature = "parallel"))]
            for (s, row) in data.chunks_mut(n).enumerate() {
                shortest_from(network, NodeId(s as u32), row);
            }
        }

        let mut matrix = Self { n, data };
        matrix.symmetrize();

        info!(
            nodes = n,
            reachable_pairs = matrix.reachable_pair_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "distance matrix ready"
        );
        Ok(matrix)
    }

    /// Rebuild a matrix from persisted rows (`None` = unreachable).
    ///
    /// # Errors
    ///
    /// [`NetworkError::MalformedMatrix`] if the rows are not square, a
    /// diagonal entry is not zero, or a distance is negative or NaN.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> NetworkResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(NetworkError::MalformedMatrix(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, d) in row.into_iter().enumerate() {
                let d = d.unwrap_or(UNREACHABLE);
                if d.is_nan() || d < 0.0 {
                    return Err(NetworkError::MalformedMatrix(format!(
                        "entry ({i}, {j}) is {d}"
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(NetworkError::MalformedMatrix(format!(
                        "diagonal entry {i} is {d}"
                    )));
                }
                data.push(d);
            }
        }
        Ok(Self { n, data })
    }

    /// Number of nodes (rows and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Raw distance, [`UNREACHABLE`] for disconnected pairs.
    #[inline]
    pub fn raw(&self, from: NodeId, to: NodeId) -> f64 {
        self.data[from.index() * self.n + to.index()]
    }

    /// Distance from `from` to `to`, or `None` if no path exists.
    #[inline]
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let d = self.raw(from, to);
        d.is_finite().then_some(d)
    }

    #[inline]
    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        self.raw(from, to).is_finite()
    }

    /// All distances from `from`, indexed by target `NodeId`.
    pub fn row(&self, from: NodeId) -> &[f64] {
        let start = from.index() * self.n;
        &self.data[start..start + self.n]
    }

    /// Largest finite distance in the matrix (0 for an empty matrix).
    pub fn max_finite(&self) -> f64 {
        self.data
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max)
    }

    /// Number of ordered pairs `(i, j)` with a finite distance, diagonal
    /// included.
    pub fn reachable_pair_count(&self) -> usize {
        self.data.iter().filter(|d| d.is_finite()).count()
    }

    fn symmetrize(&mut self) {
        let n = self.n;
        for i in 0..n {
            for j in (i + 1)..n {
                let m = self.data[i * n + j].min(self.data[j * n + i]);
                self.data[i * n + j] = m;
                self.data[j * n + i] = m;
            }
        }
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry.  Ordered so that `BinaryHeap` (a max-heap) pops the smallest
/// cost first; `NodeId` breaks ties for a deterministic expansion order.
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fill `dist` (length = node count, pre-set to `UNREACHABLE`) with the
/// shortest distances from `source`.
fn shortest_from(network: &RoadNetwork, source: NodeId, dist: &mut [f64]) {
    dist[source.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: source });

    while let Some(State { cost, node }) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (next, length) in network.neighbors(node) {
            let next_cost = cost + length;
            if next_cost < dist[next.index()] {
                dist[next.index()] = next_cost;
                heap.push(State { cost: next_cost, node: next });
            }
        }
    }
}
