//! Unit tests for siting-population.

#[cfg(test)]
mod helpers {
    use siting_core::{NodeId, Point};
    use siting_network::{RoadNetwork, RoadNetworkBuilder};

    /// Star: centre A linked to B, C, D.  Returns `[A, B, C, D]`.
    pub fn star() -> (RoadNetwork, [NodeId; 4]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let nb = b.add_node(Point::new(100.0, 0.0));
        let nc = b.add_node(Point::new(0.0, 100.0));
        let nd = b.add_node(Point::new(-100.0, 0.0));
        b.add_edge(a, nb, 100.0);
        b.add_edge(a, nc, 100.0);
        b.add_edge(a, nd, 100.0);
        (b.build().unwrap(), [a, nb, nc, nd])
    }

    /// Path 0-1-2 plus an isolated node 3.
    pub fn path_with_island() -> (RoadNetwork, [NodeId; 4]) {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(10.0, 0.0));
        let n2 = b.add_node(Point::new(20.0, 0.0));
        let n3 = b.add_node(Point::new(500.0, 500.0));
        b.add_edge(n0, n1, 10.0);
        b.add_edge(n1, n2, 10.0);
        (b.build().unwrap(), [n0, n1, n2, n3])
    }

    pub fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Distribution construction ─────────────────────────────────────────────────

#[cfg(test)]
mod distribution {
    use siting_core::NodeId;
    use crate::{NodeWeights, PopulationDistribution, PopulationError};

    #[test]
    fn sparse_input_fills_missing_nodes_with_zero() {
        let (net, [a, b, c, d]) = super::helpers::star();
        let dist = PopulationDistribution::from_sparse(&net, [(a, 100.0), (c, 5.0)]).unwrap();
        assert_eq!(dist.len(), 4);
        assert_eq!(dist.get(a), 100.0);
        assert_eq!(dist.get(b), 0.0);
        assert_eq!(dist.get(d), 0.0);
        assert_eq!(dist.total(), 105.0);
        assert_eq!(dist.nonzero().count(), 2);
    }

    #[test]
    fn repeated_nodes_are_summed() {
        let (net, [a, ..]) = super::helpers::star();
        let dist = PopulationDistribution::from_sparse(&net, [(a, 1.0), (a, 2.0)]).unwrap();
        assert_eq!(dist.get(a), 3.0);
    }

    #[test]
    fn unknown_node_rejected() {
        let (net, _) = super::helpers::star();
        let err = PopulationDistribution::from_sparse(&net, [(NodeId(9), 1.0)]).unwrap_err();
        assert!(matches!(err, PopulationError::NodeNotFound(NodeId(9))));
    }

    #[test]
    fn negative_and_nan_rejected() {
        let (net, [a, ..]) = super::helpers::star();
        assert!(matches!(
            PopulationDistribution::from_sparse(&net, [(a, -1.0)]),
            Err(PopulationError::InvalidPopulation { .. })
        ));
        assert!(PopulationDistribution::from_sparse(&net, [(a, f64::NAN)]).is_err());
        assert!(PopulationDistribution::from_dense(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn node_weights_out_of_range_is_zero() {
        let dist = PopulationDistribution::zeros(2);
        assert_eq!(dist.weight(NodeId(5)), 0.0);
        assert_eq!(dist.node_count(), 2);
    }
}

// ── Diffusion ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod diffusion {
    use super::helpers::close;
    use crate::{Diffuser, PopulationDistribution, PopulationError};

    #[test]
    fn star_single_iteration() {
        let (net, [a, b, c, d]) = super::helpers::star();
        let initial = PopulationDistribution::from_sparse(&net, [(a, 100.0)]).unwrap();
        let out = Diffuser::new(1, 0.4).unwrap().diffuse(&net, &initial).unwrap();
        assert!(close(out.get(a), 40.0), "A = {}", out.get(a));
        for leaf in [b, c, d] {
            assert!(close(out.get(leaf), 20.0), "{leaf} = {}", out.get(leaf));
        }
        assert!(close(out.total(), 100.0));
    }

    #[test]
    fn star_two_iterations_flow_back() {
        let (net, [a, b, ..]) = super::helpers::star();
        let initial = PopulationDistribution::from_sparse(&net, [(a, 100.0)]).unwrap();
        let out = Diffuser::new(2, 0.4).unwrap().diffuse(&net, &initial).unwrap();
        // A: 0.4·40 + 3 · (0.6·20 / 1) = 16 + 36 = 52
        assert!(close(out.get(a), 52.0));
        // B: 0.4·20 + 0.6·40 / 3 = 8 + 8 = 16
        assert!(close(out.get(b), 16.0));
    }

    #[test]
    fn zero_iterations_is_identity() {
        let (net, [a, b, ..]) = super::helpers::star();
        let initial = PopulationDistribution::from_sparse(&net, [(a, 7.0), (b, 3.0)]).unwrap();
        let out = Diffuser::new(0, 0.5).unwrap().diffuse(&net, &initial).unwrap();
        assert_eq!(out, initial);
    }

    #[test]
    fn isolated_node_keeps_everything() {
        let (net, [n0, _, _, island]) = super::helpers::path_with_island();
        let initial =
            PopulationDistribution::from_sparse(&net, [(n0, 50.0), (island, 33.0)]).unwrap();
        let out = Diffuser::new(25, 0.3).unwrap().diffuse(&net, &initial).unwrap();
        assert_eq!(out.get(island), 33.0);
        assert!(close(out.total(), 83.0));
    }

    #[test]
    fn zero_population_nodes_still_receive() {
        let (net, [n0, n1, n2, _]) = super::helpers::path_with_island();
        let initial = PopulationDistribution::from_sparse(&net, [(n0, 10.0)]).unwrap();
        let out = Diffuser::new(1, 0.5).unwrap().diffuse(&net, &initial).unwrap();
        assert!(close(out.get(n0), 5.0));
        assert!(close(out.get(n1), 5.0));
        assert_eq!(out.get(n2), 0.0);
    }

    #[test]
    fn retention_must_be_open_interval() {
        assert!(matches!(Diffuser::new(1, 0.0), Err(PopulationError::InvalidRetention(_))));
        assert!(Diffuser::new(1, 1.0).is_err());
        assert!(Diffuser::new(1, f64::NAN).is_err());
    }

    #[test]
    fn size_mismatch_rejected() {
        let (net, _) = super::helpers::star();
        let wrong = PopulationDistribution::zeros(2);
        assert!(matches!(
            Diffuser::new(1, 0.4).unwrap().diffuse(&net, &wrong),
            Err(PopulationError::SizeMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn from_config_uses_config_values() {
        let cfg = siting_core::SitingConfig::default();
        let d = Diffuser::from_config(&cfg).unwrap();
        assert_eq!(d.iterations(), 3);
        assert_eq!(d.retention(), 0.4);
    }
}

// ── Finalization ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod finalization {
    use siting_core::NodeId;
    use crate::{Diffuser, PopulationDistribution, finalize};

    #[test]
    fn exact_values_pass_through() {
        let dist = PopulationDistribution::from_dense(vec![40.0, 20.0, 20.0, 20.0]).unwrap();
        let fin = finalize(&dist, 100.0);
        assert_eq!(fin.counts(), &[40, 20, 20, 20]);
    }

    #[test]
    fn positive_residual_goes_to_largest() {
        // Rounds to 33 + 33 + 33 = 99; one person missing.
        let dist = PopulationDistribution::from_dense(vec![100.0 / 3.0; 3]).unwrap();
        let fin = finalize(&dist, 100.0);
        assert_eq!(fin.total(), 100);
        // Tie on 33 → lowest id wins.
        assert_eq!(fin.counts(), &[34, 33, 33]);
    }

    #[test]
    fn negative_residual_taken_from_largest() {
        // 10.6 + 5.6 → 11 + 6 = 17, original 16.
        let dist = PopulationDistribution::from_dense(vec![5.6, 10.6]).unwrap();
        let fin = finalize(&dist, 16.2);
        assert_eq!(fin.counts(), &[6, 10]);
    }

    #[test]
    fn negative_residual_never_drives_counts_below_zero() {
        // Ten nodes at 0.6 round to 1 each (10) but the total is 6.
        let dist = PopulationDistribution::from_dense(vec![0.6; 10]).unwrap();
        let fin = finalize(&dist, 6.0);
        assert_eq!(fin.total(), 6);
        assert!(fin.counts().iter().all(|&c| c <= 1));
        assert_eq!(fin.counts()[..4], [0, 0, 0, 0]);
    }

    #[test]
    fn rounds_half_to_even() {
        let dist = PopulationDistribution::from_dense(vec![0.5, 0.5, 1.5, 2.5]).unwrap();
        let fin = finalize(&dist, 5.0);
        // 0 + 0 + 2 + 2 = 4, residual 1 → largest (node 2, lowest id among the 2s).
        assert_eq!(fin.counts(), &[0, 0, 3, 2]);
    }

    #[test]
    fn diffuse_and_finalize_preserves_total_exactly() {
        let (net, [n0, n1, n2, island]) = super::helpers::path_with_island();
        let initial = PopulationDistribution::from_sparse(
            &net,
            [(n0, 1_001.0), (n1, 17.0), (n2, 3.0), (island, 9.0)],
        )
        .unwrap();
        let fin = Diffuser::new(7, 0.45).unwrap().diffuse_and_finalize(&net, &initial).unwrap();
        assert_eq!(fin.total(), 1_030);
        assert_eq!(fin.get(island), 9);
        assert_eq!(fin.get(NodeId(42)), 0);
    }

    #[test]
    fn to_distribution_round_trip() {
        let dist = PopulationDistribution::from_dense(vec![3.0, 0.0, 8.0]).unwrap();
        let fin = finalize(&dist, 11.0);
        assert_eq!(fin.to_distribution(), dist);
        assert_eq!(fin.nonzero().collect::<Vec<_>>(), vec![(NodeId(0), 3), (NodeId(2), 8)]);
    }
}

// ── Census join ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod join {
    use siting_core::Point;
    use siting_network::RoadNetworkBuilder;
    use crate::{CensusTract, PopulationDistribution, PopulationError, aggregate_by_nearest_node};

    #[test]
    fn tracts_snap_and_sum() {
        let (net, [a, b, c, _]) = super::helpers::star();
        let tracts = [
            CensusTract { centroid: Point::new(5.0, 5.0), population: 120.0 },
            CensusTract { centroid: Point::new(90.0, 3.0), population: 40.0 },
            CensusTract { centroid: Point::new(110.0, -4.0), population: 60.0 },
            CensusTract { centroid: Point::new(0.0, 95.0), population: 0.0 },
        ];
        let by_node = aggregate_by_nearest_node(&net, &tracts).unwrap();
        assert_eq!(by_node.get(&a), Some(&120.0));
        assert_eq!(by_node.get(&b), Some(&100.0));
        assert_eq!(by_node.get(&c), Some(&0.0));

        let dist = PopulationDistribution::from_sparse(&net, by_node).unwrap();
        assert_eq!(dist.total(), 220.0);
    }

    #[test]
    fn empty_network_rejected() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        let tracts = [CensusTract { centroid: Point::new(0.0, 0.0), population: 1.0 }];
        assert!(matches!(
            aggregate_by_nearest_node(&net, &tracts),
            Err(PopulationError::EmptyNetwork)
        ));
        assert!(aggregate_by_nearest_node(&net, &[]).unwrap().is_empty());
    }

    #[test]
    fn invalid_tract_reports_index() {
        let (net, _) = super::helpers::star();
        let tracts = [
            CensusTract { centroid: Point::new(0.0, 0.0), population: 1.0 },
            CensusTract { centroid: Point::new(0.0, 0.0), population: -3.0 },
        ];
        assert!(matches!(
            aggregate_by_nearest_node(&net, &tracts),
            Err(PopulationError::InvalidTract { index: 1, .. })
        ));
    }
}

// ── Conservation property ─────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use siting_core::{NodeId, Point};
    use siting_network::RoadNetworkBuilder;
    use crate::{Diffuser, PopulationDistribution};

    proptest! {
        #[test]
        fn mass_is_conserved(
            n in 1usize..15,
            edges in prop::collection::vec((0usize..15, 0usize..15), 0..40),
            pops in prop::collection::vec(0u32..5_000, 15),
            iterations in 0u32..12,
            retention in 0.01f64..0.99,
        ) {
            let mut b = RoadNetworkBuilder::new();
            for i in 0..n {
                b.add_node(Point::new(i as f64, 0.0));
            }
            for (a, c) in edges {
                if a < n && c < n {
                    b.add_edge(NodeId(a as u32), NodeId(c as u32), 1.0);
                }
            }
            let net = b.build().unwrap();
            let initial = PopulationDistribution::from_sparse(
                &net,
                pops.iter().take(n).enumerate().map(|(i, &p)| (NodeId(i as u32), p as f64)),
            ).unwrap();
            let expected = initial.total();

            let diffuser = Diffuser::new(iterations, retention).unwrap();
            let smoothed = diffuser.diffuse(&net, &initial).unwrap();
            prop_assert!((smoothed.total() - expected).abs() <= 1e-9 * expected.max(1.0));
            prop_assert!(smoothed.values().iter().all(|&p| p >= 0.0));

            let fin = diffuser.diffuse_and_finalize(&net, &initial).unwrap();
            prop_assert_eq!(fin.total(), expected as u64);
        }
    }
}
