//! Unit tests for siting-network.
//!
//! All tests use hand-crafted networks so they run without any external data.

#[cfg(test)]
mod helpers {
    use siting_core::{NodeId, Point};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (x, y):
    ///   0:(0,0)  1:(100,0)  2:(200,0)
    ///   3:(0,100)           4:(200,100)
    ///
    /// Undirected edges: 0-1, 1-2, 2-4 (100 m each), 0-3 (500 m), 3-4 (100 m)
    ///
    /// Shortest 0→4 is 0→1→2→4 = 300 m; 0→3→4 costs 600 m.
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(100.0, 0.0));
        let n2 = b.add_node(Point::new(200.0, 0.0));
        let n3 = b.add_node(Point::new(0.0, 100.0));
        let n4 = b.add_node(Point::new(200.0, 100.0));

        b.add_edge(n0, n1, 100.0);
        b.add_edge(n1, n2, 100.0);
        b.add_edge(n2, n4, 100.0);
        b.add_edge(n0, n3, 500.0); // long detour
        b.add_edge(n3, n4, 100.0);

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }

    /// Two components: 0-1 and 2 isolated.
    pub fn split_network() -> (RoadNetwork, [NodeId; 3]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(10.0, 0.0));
        let d = b.add_node(Point::new(50.0, 50.0));
        b.add_edge(a, c, 10.0);
        (b.build().unwrap(), [a, c, d])
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use siting_core::{NodeId, Point};
    use crate::{NetworkError, RoadNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn single_edge_is_undirected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1_000.0, 0.0));
        b.add_edge(a, c, 1_000.0);
        let net = b.build().unwrap();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.degree(a), 1);
        assert_eq!(net.degree(c), 1);
        assert_eq!(net.neighbors(c).next(), Some((a, 1_000.0)));
    }

    #[test]
    fn degrees_on_grid() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        for n in [n0, n1, n2, n3, n4] {
            assert_eq!(net.degree(n), 2, "{n} should have 2 neighbours");
        }
    }

    #[test]
    fn directed_edge_is_symmetrized() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0); // one-way in the source graph
        let net = b.build().unwrap();
        assert_eq!(net.degree(a), 1);
        assert_eq!(net.degree(c), 1);
    }

    #[test]
    fn parallel_edges_collapse_to_shortest() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 1.0));
        b.add_edge(a, c, 300.0);
        b.add_directed_edge(c, a, 120.0);
        b.add_edge(a, c, 200.0);
        let net = b.build().unwrap();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.degree(a), 1);
        assert_eq!(net.neighbors(a).next(), Some((c, 120.0)));
        assert_eq!(net.neighbors(c).next(), Some((a, 120.0)));
    }

    #[test]
    fn self_loops_dropped() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        b.add_edge(a, a, 50.0);
        let net = b.build().unwrap();
        assert_eq!(net.degree(a), 0);
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn unknown_source_endpoint_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        b.add_edge(NodeId(7), a, 10.0);
        assert!(matches!(b.build(), Err(NetworkError::NodeNotFound(NodeId(7)))));
    }

    #[test]
    fn unknown_target_endpoint_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(5.0, 0.0));
        b.add_edge(a, c, 5.0);
        b.add_directed_edge(a, NodeId(2), 10.0);
        assert!(matches!(b.build(), Err(NetworkError::NodeNotFound(NodeId(2)))));
    }

    #[test]
    fn check_node_bounds() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert!(net.check_node(n0).is_ok());
        assert!(net.check_node(siting_core::NodeId(99)).is_err());
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use siting_core::Point;
    use crate::RoadNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(Point::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(Point::new(40.0, 0.0)), Some(n0));
        assert_eq!(net.snap_to_node(Point::new(60.0, 5.0)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert!(net.snap_to_node(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (net, nodes) = super::helpers::grid_network();
        let nearest = net.k_nearest_nodes(Point::new(0.0, 0.0), 2);
        assert_eq!(nearest[0], nodes[0]);
        // n1 and n3 are both 100 m away.
        assert!(nearest[1] == nodes[1] || nearest[1] == nodes[3]);
    }
}

// ── Distance matrix ───────────────────────────────────────────────────────────

#[cfg(test)]
mod matrix {
    use siting_core::Point;
    use crate::{DistanceMatrix, NetworkError, RoadNetworkBuilder, UNREACHABLE};

    #[test]
    fn shortest_distances_on_grid() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        let m = DistanceMatrix::compute(&net).unwrap();
        assert_eq!(m.len(), 5);
        assert_eq!(m.get(n0, n0), Some(0.0));
        assert_eq!(m.get(n0, n1), Some(100.0));
        assert_eq!(m.get(n0, n4), Some(300.0));
        // 0→3 via 1,2,4 (400 m) beats the direct 500 m edge.
        assert_eq!(m.get(n0, n3), Some(400.0));
        assert_eq!(m.get(n3, n2), Some(200.0));
    }

    #[test]
    fn disconnected_pairs_are_unreachable() {
        let (net, [a, c, d]) = super::helpers::split_network();
        let m = DistanceMatrix::compute(&net).unwrap();
        assert_eq!(m.get(a, c), Some(10.0));
        assert_eq!(m.get(a, d), None);
        assert_eq!(m.raw(d, a), UNREACHABLE);
        assert!(!m.is_reachable(c, d));
        assert_eq!(m.get(d, d), Some(0.0));
        // a↔a, a↔c, c↔a, c↔c, d↔d
        assert_eq!(m.reachable_pair_count(), 5);
    }

    #[test]
    fn negative_length_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1.0, 0.0));
        b.add_edge(a, c, -5.0);
        let net = b.build().unwrap();
        let err = DistanceMatrix::compute(&net).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidWeight { weight, .. } if weight == -5.0));
    }

    #[test]
    fn nan_length_rejected_even_with_parallel_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1.0, 0.0));
        b.add_edge(a, c, 10.0);
        b.add_edge(a, c, f64::NAN);
        let net = b.build().unwrap();
        assert!(matches!(
            DistanceMatrix::compute(&net),
            Err(NetworkError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn infinite_length_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1.0, 0.0));
        b.add_edge(a, c, 40.0);
        b.add_edge(c, a, f64::INFINITY);
        let net = b.build().unwrap();
        assert!(matches!(
            DistanceMatrix::compute(&net),
            Err(NetworkError::InvalidWeight { weight, .. }) if weight.is_infinite()
        ));
        assert_eq!(net.find_invalid_length().map(|(_, _, w)| w), Some(f64::INFINITY));
    }

    #[test]
    fn zero_length_edges_allowed() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 0.0));
        b.add_edge(a, c, 0.0);
        let m = DistanceMatrix::compute(&b.build().unwrap()).unwrap();
        assert_eq!(m.get(a, c), Some(0.0));
    }

    #[test]
    fn empty_network_gives_empty_matrix() {
        let m = DistanceMatrix::compute(&RoadNetworkBuilder::new().build().unwrap()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.max_finite(), 0.0);
    }

    #[test]
    fn max_finite_ignores_sentinel() {
        let (net, _) = super::helpers::split_network();
        let m = DistanceMatrix::compute(&net).unwrap();
        assert_eq!(m.max_finite(), 10.0);
    }

    #[test]
    fn from_rows_accepts_computed_rows() {
        let (net, _) = super::helpers::split_network();
        let m = DistanceMatrix::compute(&net).unwrap();
        let rows: Vec<Vec<Option<f64>>> = net
            .nodes()
            .map(|i| net.nodes().map(|j| m.get(i, j)).collect())
            .collect();
        assert_eq!(DistanceMatrix::from_rows(rows).unwrap(), m);
    }

    #[test]
    fn from_rows_rejects_ragged_and_negative() {
        let ragged = vec![vec![Some(0.0), Some(1.0)], vec![Some(1.0)]];
        assert!(matches!(
            DistanceMatrix::from_rows(ragged),
            Err(NetworkError::MalformedMatrix(_))
        ));
        let negative = vec![vec![Some(0.0), Some(-1.0)], vec![Some(-1.0), Some(0.0)]];
        assert!(DistanceMatrix::from_rows(negative).is_err());
        let bad_diagonal = vec![vec![Some(2.0)]];
        assert!(DistanceMatrix::from_rows(bad_diagonal).is_err());
    }

    #[test]
    fn row_slice_matches_get() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let m = DistanceMatrix::compute(&net).unwrap();
        let row = m.row(n0);
        for j in net.nodes() {
            assert_eq!(row[j.index()], m.raw(n0, j));
        }
    }
}

// ── Metric properties ─────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use siting_core::{NodeId, Point};
    use crate::{DistanceMatrix, RoadNetwork, RoadNetworkBuilder};

    /// Random sparse graph: up to 12 nodes, up to 30 edges with lengths in
    /// [0, 1000).  May be disconnected.
    fn arb_network() -> impl Strategy<Value = RoadNetwork> {
        (2usize..12).prop_flat_map(|n| {
            prop::collection::vec((0..n, 0..n, 0.0f64..1_000.0), 0..30).prop_map(move |edges| {
                let mut b = RoadNetworkBuilder::with_capacity(n, edges.len());
                for i in 0..n {
                    b.add_node(Point::new(i as f64, 0.0));
                }
                for (a, c, len) in edges {
                    b.add_edge(NodeId(a as u32), NodeId(c as u32), len);
                }
                b.build().unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn symmetric(net in arb_network()) {
            let m = DistanceMatrix::compute(&net).unwrap();
            for i in net.nodes() {
                for j in net.nodes() {
                    prop_assert_eq!(m.raw(i, j).to_bits(), m.raw(j, i).to_bits());
                }
            }
        }

        #[test]
        fn triangle_inequality(net in arb_network()) {
            let m = DistanceMatrix::compute(&net).unwrap();
            for i in net.nodes() {
                for j in net.nodes() {
                    for k in net.nodes() {
                        let (Some(ik), Some(ij), Some(jk)) = (m.get(i, k), m.get(i, j), m.get(j, k)) else {
                            continue;
                        };
                        prop_assert!(ik <= ij + jk + 1e-9 * (ij + jk).max(1.0));
                    }
                }
            }
        }

        #[test]
        fn edge_length_bounds_distance(net in arb_network()) {
            let m = DistanceMatrix::compute(&net).unwrap();
            for a in net.nodes() {
                for (c, len) in net.neighbors(a) {
                    let d = m.get(a, c);
                    prop_assert!(d.is_some());
                    prop_assert!(d.unwrap_or(f64::INFINITY) <= len);
                }
            }
        }
    }
}
