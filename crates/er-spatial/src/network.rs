//! Road network representation and builder.
//!
//! # Data layout
//!
//! Edges live in **Compressed Sparse Row (CSR)** order by source node.  The
//! outgoing edges of `NodeId n` are the `EdgeId`s
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! A second CSR over the same edges, keyed by destination, gives the incoming
//! edges of `n`:
//!
//! ```text
//! in_edges[ node_in_start[n] .. node_in_start[n+1] ]
//! ```
//!
//! Both directions are therefore a contiguous slice scan, which is what the
//! backward half of the bidirectional search needs.
//!
//! # Edge weights
//!
//! Each edge stores its raw `duration` (seconds) and a derived `weight`
//! computed by [`duration_factor`].  The weight depends on that edge's own
//! duration only.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use er_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── Duration → weight ─────────────────────────────────────────────────────────

/// Multiplicative factor applied to a raw segment duration.
///
/// Long highway-like segments (> 400 s) are favoured; mid-range segments are
/// discounted harder.  The table is empirically tuned and must not be
/// smoothed or reordered.
#[inline]
pub fn duration_factor(duration_secs: f64) -> f64 {
    if duration_secs > 400.0 {
        0.8
    } else if duration_secs > 300.0 {
        0.1
    } else if duration_secs > 200.0 {
        0.2
    } else if duration_secs > 100.0 {
        0.3
    } else if duration_secs > 40.0 {
        0.4
    } else {
        0.5
    }
}

/// Traversal weight of a segment with the given raw duration.
#[inline]
pub fn edge_weight(duration_secs: f64) -> f64 {
    duration_secs * duration_factor(duration_secs)
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lon, lat]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degree space; adequate for snapping a
    /// station to its nearest intersection within one district.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph with forward and reverse CSR adjacency.
///
/// Fields are `pub` for indexed access in the search loop.  Build through
/// [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// External (whitespace-trimmed) identifier of each node.
    pub node_key: Vec<String>,

    /// Position of each node.  First occurrence in the input wins.
    pub node_pos: Vec<GeoPoint>,

    // ── Forward CSR ───────────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Reverse CSR ───────────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_in_start: Vec<u32>,

    /// Forward `EdgeId`s grouped by destination node.
    pub in_edges: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Raw recorded duration in seconds.
    pub edge_duration: Vec<f64>,

    /// `edge_weight(duration)`; the search cost before any direction factor.
    pub edge_weight: Vec<f64>,

    key_index: HashMap<String, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    /// `NodeId` for an external identifier.  The identifier is trimmed first.
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key.trim()).copied()
    }

    /// Like [`node_id`](Self::node_id) but fails with
    /// [`SpatialError::UnknownNode`].
    pub fn resolve(&self, key: &str) -> SpatialResult<NodeId> {
        self.node_id(key)
            .ok_or_else(|| SpatialError::UnknownNode(key.trim().to_owned()))
    }

    #[inline]
    pub fn key(&self, node: NodeId) -> &str {
        &self.node_key[node.index()]
    }

    #[inline]
    pub fn pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Edges arriving at `node`, as forward `EdgeId`s.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        (self.node_in_start[node.index() + 1] - self.node_in_start[node.index()]) as usize
    }

    /// The stored edge `from → to`, if any.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    /// Stored weight of `from → to`, if that edge exists.
    pub fn weight_between(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.edge_between(from, to).map(|e| self.edge_weight[e.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest road node to `pos`; `None` only for an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lon, pos.lat])
            .map(|e| e.id)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// - Nodes are keyed by trimmed string identifier; re-adding a known key
///   keeps the first position.
/// - A repeated `from → to` pair overwrites the earlier edge's duration and
///   weight (last write wins) instead of adding a parallel edge.
///
/// # Example
///
/// ```
/// use er_core::GeoPoint;
/// use er_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node("101", GeoPoint::new(126.95, 37.55));
/// let c = b.add_node("102", GeoPoint::new(126.96, 37.55));
/// b.add_edge(a, c, 150.0); // weight = 150 * 0.3
/// let net = b.build();
/// assert_eq!(net.edge_count(), 1);
/// assert_eq!(net.weight_between(a, c), Some(45.0));
/// ```
pub struct RoadNetworkBuilder {
    keys:      Vec<String>,
    nodes:     Vec<GeoPoint>,
    key_index: HashMap<String, NodeId>,
    raw_edges: Vec<RawEdge>,
    edge_slot: HashMap<(NodeId, NodeId), usize>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    duration: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            keys:      Vec::with_capacity(nodes),
            nodes:     Vec::with_capacity(nodes),
            key_index: HashMap::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            edge_slot: HashMap::with_capacity(edges),
        }
    }

    /// Register a node, or return the existing id for an already-seen key.
    pub fn add_node(&mut self, key: &str, pos: GeoPoint) -> NodeId {
        let key = key.trim();
        if let Some(&id) = self.key_index.get(key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.keys.push(key.to_owned());
        self.nodes.push(pos);
        self.key_index.insert(key.to_owned(), id);
        id
    }

    /// Add (or overwrite) the **directed** edge `from → to` with a raw
    /// duration in seconds.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, duration_secs: f64) {
        match self.edge_slot.get(&(from, to)) {
            Some(&slot) => self.raw_edges[slot].duration = duration_secs,
            None => {
                self.edge_slot.insert((from, to), self.raw_edges.len());
                self.raw_edges.push(RawEdge { from, to, duration: duration_secs });
            }
        }
    }

    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key.trim()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// The sort is stable, so a node's outgoing edges keep their insertion
    /// order.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_duration: Vec<f64>    = raw.iter().map(|e| e.duration).collect();
        let edge_weight:   Vec<f64>    = raw.iter().map(|e| edge_weight(e.duration)).collect();

        let node_out_start = row_pointers(node_count, edge_from.iter());
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Reverse CSR: bucket forward edge ids by destination.
        let node_in_start = row_pointers(node_count, edge_to.iter());
        let mut fill = node_in_start.clone();
        let mut in_edges = vec![EdgeId::INVALID; edge_count];
        for (i, to) in edge_to.iter().enumerate() {
            let slot = &mut fill[to.index()];
            in_edges[*slot as usize] = EdgeId(i as u32);
            *slot += 1;
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: [pos.lon, pos.lat], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_key: self.keys,
            node_pos: self.nodes,
            node_out_start,
            node_in_start,
            in_edges,
            edge_from,
            edge_to,
            edge_duration,
            edge_weight,
            key_index: self.key_index,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// CSR row pointer array for edges bucketed by `owners`.
fn row_pointers<'a>(node_count: usize, owners: impl Iterator<Item = &'a NodeId>) -> Vec<u32> {
    let mut start = vec![0u32; node_count + 1];
    for n in owners {
        start[n.index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }
    start
}
