//! Result Assembler.
//!
//! Sorts candidates by opening weight (descending, `NodeId` ascending on
//! ties), numbers them from 1 and joins each with its coordinates from the
//! road network.  The first `K` rows are the chosen sites.

use tracing::info;

use siting_network::RoadNetwork;
use siting_solve::OptimizationResult;

use crate::{OutputResult, RankedSite};

/// All candidates in rank order, plus the size of the chosen prefix.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedTable {
    rows:     Vec<RankedSite>,
    selected: usize,
}

impl RankedTable {
    /// Rank the candidates of `result` and mark the first `k` as selected.
    ///
    /// A `k` larger than the number of candidates selects all of them.
    ///
    /// # Errors
    ///
    /// [`OutputError::Network`](crate::OutputError::Network) if a candidate
    /// is not a node of `network`.
    pub fn assemble(
        result:  &OptimizationResult,
        network: &RoadNetwork,
        k:       usize,
    ) -> OutputResult<Self> {
        let mut order = result.weights.clone();
        order.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let rows = order
            .into_iter()
            .enumerate()
            .map(|(i, (node, weight))| -> OutputResult<RankedSite> {
                let pos = network.position(network.check_node(node)?);
                Ok(RankedSite { node, weight, rank: i + 1, x: pos.x, y: pos.y })
            })
            .collect::<OutputResult<Vec<_>>>()?;

        let selected = k.min(rows.len());
        let table = Self { rows, selected };
        info!(
            candidates = table.rows.len(),
            selected   = ?table.selected().iter().map(|r| r.node.0).collect::<Vec<_>>(),
            "result table assembled"
        );
        Ok(table)
    }

    /// Every candidate in rank order.
    pub fn rows(&self) -> &[RankedSite] {
        &self.rows
    }

    /// The first `K` rows: the chosen facility sites.
    pub fn selected(&self) -> &[RankedSite] {
        &self.rows[..self.selected]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
