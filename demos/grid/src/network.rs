//! Synthetic street grid and census tracts.
//!
//! A `COLS × ROWS` lattice of intersections `BLOCK_M` metres apart, with a
//! river cutting the grid between two columns except at two bridges, and a
//! set of census tracts whose headcounts peak in two neighbourhoods.

use siting_core::{NodeId, Point};
use siting_network::{NetworkResult, RoadNetwork, RoadNetworkBuilder};
use siting_population::CensusTract;

pub const COLS:    usize = 12;
pub const ROWS:    usize = 10;
pub const BLOCK_M: f64   = 150.0;

/// The river runs between these two columns.
const RIVER_WEST: usize = 6;
/// Rows where a bridge crosses the river.
const BRIDGE_ROWS: [usize; 2] = [2, 7];

/// Build the grid.  Node `r * COLS + c` sits at `(c, r) * BLOCK_M`.
pub fn build_network() -> NetworkResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::with_capacity(COLS * ROWS, 2 * COLS * ROWS);

    let ids: Vec<NodeId> = (0..ROWS)
        .flat_map(|r| (0..COLS).map(move |c| (r, c)))
        .map(|(r, c)| b.add_node(Point::new(c as f64 * BLOCK_M, r as f64 * BLOCK_M)))
        .collect();
    let at = |r: usize, c: usize| ids[r * COLS + c];

    for r in 0..ROWS {
        for c in 0..COLS {
            if c + 1 < COLS && (c != RIVER_WEST || BRIDGE_ROWS.contains(&r)) {
                // Bridges are longer than a block.
                let len = if c == RIVER_WEST { 2.5 * BLOCK_M } else { BLOCK_M };
                b.add_edge(at(r, c), at(r, c + 1), len);
            }
            if r + 1 < ROWS {
                b.add_edge(at(r, c), at(r + 1, c), BLOCK_M);
            }
        }
    }

    b.build()
}

/// One tract per 2×2 block, centred between intersections.  Headcount
/// falls off with distance from two neighbourhood centres.
pub fn census_tracts() -> Vec<CensusTract> {
    let centres = [
        (Point::new(2.0 * BLOCK_M, 3.0 * BLOCK_M), 2_400.0),
        (Point::new(9.0 * BLOCK_M, 7.0 * BLOCK_M), 1_600.0),
    ];

    let mut tracts = Vec::new();
    for r in (0..ROWS).step_by(2) {
        for c in (0..COLS).step_by(2) {
            let centroid = Point::new((c as f64 + 0.5) * BLOCK_M, (r as f64 + 0.5) * BLOCK_M);
            let population: f64 = centres
                .iter()
                .map(|&(centre, peak)| {
                    let blocks = centroid.distance(centre) / BLOCK_M;
                    peak / (1.0 + blocks * blocks)
                })
                .sum::<f64>()
                .round();
            tracts.push(CensusTract { centroid, population });
        }
    }
    tracts
}
