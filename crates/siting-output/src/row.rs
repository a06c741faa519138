//! Plain data row type written by export backends.

use siting_core::NodeId;

/// One candidate site in the ranked result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSite {
    pub node:   NodeId,
    /// Opening weight in `[0, 1]`.
    pub weight: f64,
    /// 1-based position after sorting by weight.
    pub rank:   usize,
    pub x:      f64,
    pub y:      f64,
}
