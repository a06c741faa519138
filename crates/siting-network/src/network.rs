//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph is stored as an **undirected** adjacency in Compressed Sparse
//! Row (CSR) format.  Every undirected edge `{a, b}` appears twice, once in
//! the row of `a` and once in the row of `b`.  Given a `NodeId n`, its
//! neighbours occupy the slice:
//!
//! ```text
//! adj_to[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! Rows are sorted by neighbour id and hold each neighbour at most once, so
//! the row length is the number of distinct neighbours.  Dijkstra and the
//! diffusion gather both iterate rows as contiguous memory scans.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps projected `(x, y)` to the nearest `NodeId`.
//! Used by the census join to attach tract centroids to road nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use siting_core::{NodeId, Point};

use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [x, y]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus a spatial index for node snapping.
///
/// Read-only once built.  Every pipeline stage borrows it; none mutates it.
/// Construct through [`RoadNetworkBuilder`].
#[derive(Debug)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Projected position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Neighbours of node `n` are at adjacency slots
    /// `adj_start[n] .. adj_start[n+1]`.  Length = `node_count + 1`.
    pub adj_start: Vec<u32>,

    /// Neighbour node of each adjacency slot.
    pub adj_to: Vec<NodeId>,

    /// Edge length of each adjacency slot, in projection units (metres).
    pub adj_length: Vec<f64>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().assemble()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` is a valid index into this network.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Return `node` unchanged if it belongs to the network.
    pub fn check_node(&self, node: NodeId) -> NetworkResult<NodeId> {
        if self.contains(node) {
            Ok(node)
        } else {
            Err(NetworkError::NodeNotFound(node))
        }
    }

    /// Iterator over every node id in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(|i| NodeId(i as u32))
    }

    /// Position of `node`.
    #[inline]
    pub fn position(&self, node: NodeId) -> Point {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    #[inline]
    fn row(&self, node: NodeId) -> std::ops::Range<usize> {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        start..end
    }

    /// Iterator over `(neighbour, length)` pairs of `node`.
    ///
    /// Contiguous slice scan, no allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.row(node).map(|i| (self.adj_to[i], self.adj_length[i]))
    }

    /// Number of distinct neighbours of `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.row(node).len()
    }

    /// First adjacency slot whose length is negative, infinite or NaN, as
    /// `(from, to, length)`.
    pub fn find_invalid_length(&self) -> Option<(NodeId, NodeId, f64)> {
        self.nodes().find_map(|from| {
            self.neighbors(from)
                .find(|&(_, len)| !is_valid_length(len))
                .map(|(to, len)| (from, to, len))
        })
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Point, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

#[inline]
fn is_valid_length(len: f64) -> bool {
    len.is_finite() && len >= 0.0
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Edges may be added in any order and in either direction.  `build()`
/// symmetrizes them, drops self loops, collapses parallel edges to the
/// shortest one, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use siting_core::Point;
/// use siting_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0));
/// let c = b.add_node(Point::new(120.0, 0.0));
/// b.add_edge(a, c, 120.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 1);
/// assert_eq!(net.degree(a), 1);
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<Point>,
    raw_edges: Vec<RawEdge>,
}

#[derive(Clone, Copy)]
struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    length: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add an undirected edge between `a` and `b`.
    ///
    /// Lengths are not checked here; a negative, infinite or NaN length is
    /// reported as [`NetworkError::InvalidWeight`] by the distance-matrix
    /// engine.  Unknown endpoints are rejected by [`build`](Self::build).
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, length: f64) {
        self.raw_edges.push(RawEdge { from: a, to: b, length });
    }

    /// Add an edge as delivered by a directed source graph.
    ///
    /// Direction is discarded on build: the network is undirected for every
    /// computation in this crate.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length: f64) {
        self.add_edge(from, to, length);
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Point {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the adjacency sort + O(N log N) for
    /// the R-tree bulk load.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NodeNotFound`] if an edge names a node that was never
    /// added.
    pub fn build(self) -> NetworkResult<RoadNetwork> {
        let node_count = self.nodes.len();
        if let Some(unknown) = self
            .raw_edges
            .iter()
            .flat_map(|e| [e.from, e.to])
            .find(|id| id.index() >= node_count)
        {
            return Err(NetworkError::NodeNotFound(unknown));
        }
        Ok(self.assemble())
    }

    /// CSR assembly.  Every endpoint must already be in range.
    fn assemble(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        // Both directions of every non-loop edge.
        let mut slots: Vec<RawEdge> = Vec::with_capacity(self.raw_edges.len() * 2);
        for e in &self.raw_edges {
            if e.from == e.to {
                continue;
            }
            slots.push(*e);
            slots.push(RawEdge { from: e.to, to: e.from, length: e.length });
        }
        slots.sort_unstable_by_key(|e| (e.from.0, e.to.0));

        // Collapse parallel edges.  An invalid length wins so that the matrix
        // engine still sees and reports it.
        let mut merged: Vec<RawEdge> = Vec::with_capacity(slots.len());
        for e in slots {
            match merged.last_mut() {
                Some(last) if last.from == e.from && last.to == e.to => {
                    if !is_valid_length(last.length) {
                        continue;
                    }
                    if !is_valid_length(e.length) || e.length < last.length {
                        last.length = e.length;
                    }
                }
                _ => merged.push(e),
            }
        }

        let adj_to:     Vec<NodeId> = merged.iter().map(|e| e.to).collect();
        let adj_length: Vec<f64>    = merged.iter().map(|e| e.length).collect();

        let mut adj_start = vec![0u32; node_count + 1];
        for e in &merged {
            adj_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, adj_to.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            adj_start,
            adj_to,
            adj_length,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
