//! Routing trait and the bidirectional meeting-point search.
//!
//! # Cost model
//!
//! The two halves of the search model the same vehicle under two cost
//! regimes:
//!
//! | Direction | Edges followed | Edge cost                    |
//! |-----------|----------------|------------------------------|
//! | forward   | outgoing       | `weight * weight_factor`     |
//! | backward  | incoming       | `weight`                     |
//!
//! A node popped in one direction that already carries a tentative distance
//! from the other is a meeting candidate.  Its cost is the *later* of the two
//! arrival estimates, `max(dF, dB)`, and it only qualifies when the estimates
//! differ by less than `max_time_diff`.
//!
//! # Alternation
//!
//! Directions alternate one settled node per turn.  Popping a stale entry
//! does not consume the turn.  The search stops when either frontier runs
//! dry, or once a meeting node exists and the two frontier minima sum to at
//! least the best meeting cost.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use er_core::{NodeId, TrialConfig};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Tunables for one bidirectional search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchParams {
    /// Meeting candidates need `|dF - dB| < max_time_diff` (seconds).
    pub max_time_diff: f64,
    /// Forward-direction multiplier on every edge weight.
    pub weight_factor: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { max_time_diff: 60.0, weight_factor: 0.692 }
    }
}

impl From<&TrialConfig> for SearchParams {
    fn from(config: &TrialConfig) -> Self {
        Self { max_time_diff: config.max_time_diff, weight_factor: config.weight_factor }
    }
}

// ── MeetingRoute ──────────────────────────────────────────────────────────────

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRoute {
    /// `forward_path` followed by `backward_path[1..]`.
    pub path: Vec<NodeId>,
    /// `max(dF, dB)` at the meeting node when it was recorded.
    pub best_cost: f64,
    pub meeting: NodeId,
    /// Source → meeting node.
    pub forward_path: Vec<NodeId>,
    /// Meeting node → target.
    pub backward_path: Vec<NodeId>,
}

impl MeetingRoute {
    fn trivial(node: NodeId) -> Self {
        Self {
            path:          vec![node],
            best_cost:     0.0,
            meeting:       node,
            forward_path:  vec![node],
            backward_path: vec![node],
        }
    }

    /// Number of nodes on the full path (the meeting node counted once).
    pub fn path_len(&self) -> usize {
        self.forward_path.len() + self.backward_path.len() - 1
    }

    /// `true` if source and target coincide.
    pub fn is_trivial(&self) -> bool {
        self.path.len() == 1
    }
}

/// Re-sum `weight * factor` over consecutive hops of `path`.
///
/// A hop with no stored edge contributes 0.  Backward legs reconstructed from
/// predecessor links can in principle contain such a hop; it is tolerated
/// rather than reported.
pub fn leg_cost(network: &RoadNetwork, path: &[NodeId], factor: f64) -> f64 {
    path.windows(2)
        .map(|w| network.weight_between(w[0], w[1]).map_or(0.0, |wt| wt * factor))
        .sum()
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path finder used by the trial simulator.
///
/// Implementations must be `Send + Sync`: the simulator shares one router
/// across Rayon workers when the `parallel` feature is on.
pub trait Router: Send + Sync {
    /// Find a route from `from` to `to`.
    ///
    /// Returns [`SpatialError::NoRoute`] when the searches never meet; other
    /// errors indicate bad input.
    fn find_path(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
    ) -> SpatialResult<MeetingRoute>;
}

/// The asymmetric-cost bidirectional search described in the module docs.
#[derive(Copy, Clone, Debug, Default)]
pub struct BidirectionalRouter {
    pub params: SearchParams,
}

impl BidirectionalRouter {
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }
}

impl Router for BidirectionalRouter {
    fn find_path(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
    ) -> SpatialResult<MeetingRoute> {
        bidirectional_search(network, from, to, self.params)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Heap key: an `f64` cost ordered with `total_cmp`.  Costs are sums of
/// finite non-negative weights, so the NaN ordering never comes into play.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// One direction's share of the search state.
struct Side {
    dist:     Vec<f64>,
    prev:     Vec<NodeId>,
    settled:  Vec<bool>,
    // Min-heap via Reverse; NodeId breaks cost ties deterministically.
    frontier: BinaryHeap<Reverse<(Cost, NodeId)>>,
}

impl Side {
    fn new(node_count: usize, origin: NodeId) -> Self {
        let mut side = Side {
            dist:     vec![f64::INFINITY; node_count],
            prev:     vec![NodeId::INVALID; node_count],
            settled:  vec![false; node_count],
            frontier: BinaryHeap::new(),
        };
        side.dist[origin.index()] = 0.0;
        side.frontier.push(Reverse((Cost(0.0), origin)));
        side
    }

    /// Smallest pending key, stale or not; `+inf` when empty.
    fn min_pending(&self) -> f64 {
        self.frontier.peek().map_or(f64::INFINITY, |Reverse((c, _))| c.0)
    }

    fn relax(&mut self, from: NodeId, to: NodeId, cost: f64) {
        let candidate = self.dist[from.index()] + cost;
        if candidate < self.dist[to.index()] {
            self.dist[to.index()] = candidate;
            self.prev[to.index()] = from;
            self.frontier.push(Reverse((Cost(candidate), to)));
        }
    }

    fn expand(&mut self, network: &RoadNetwork, node: NodeId, dir: Direction, factor: f64) {
        match dir {
            Direction::Forward => {
                for e in network.out_edges(node) {
                    let next = network.edge_to[e.index()];
                    self.relax(node, next, network.edge_weight[e.index()] * factor);
                }
            }
            Direction::Backward => {
                for e in network.in_edges(node) {
                    let next = network.edge_from[e.index()];
                    self.relax(node, next, network.edge_weight[e.index()]);
                }
            }
        }
    }

    /// Follow predecessor links from `node` back to this side's origin.
    /// The result starts at `node`.
    fn trace(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        let mut cur = node;
        // Predecessor links form a tree; the bound only guards corrupt state.
        while out.len() <= self.prev.len() {
            let p = self.prev[cur.index()];
            if !p.is_valid() {
                break;
            }
            out.push(p);
            cur = p;
        }
        out
    }
}

/// Run the bidirectional search from `source` to `target`.
pub fn bidirectional_search(
    network: &RoadNetwork,
    source: NodeId,
    target: NodeId,
    params: SearchParams,
) -> SpatialResult<MeetingRoute> {
    for node in [source, target] {
        if !network.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    if source == target {
        return Ok(MeetingRoute::trivial(source));
    }

    let n = network.node_count();
    let mut fwd = Side::new(n, source);
    let mut bwd = Side::new(n, target);

    let mut best_cost = f64::INFINITY;
    let mut meeting: Option<NodeId> = None;
    let mut dir = Direction::Forward;

    while !fwd.frontier.is_empty() && !bwd.frontier.is_empty() {
        let (this, other) = match dir {
            Direction::Forward  => (&mut fwd, &bwd),
            Direction::Backward => (&mut bwd, &fwd),
        };

        let Some(Reverse((_, u))) = this.frontier.pop() else { break };
        if this.settled[u.index()] {
            continue;
        }
        this.settled[u.index()] = true;

        let here  = this.dist[u.index()];
        let there = other.dist[u.index()];
        if there.is_finite() {
            let total = here.max(there);
            if (here - there).abs() < params.max_time_diff && total < best_cost {
                best_cost = total;
                meeting = Some(u);
            }
        }

        this.expand(network, u, dir, params.weight_factor);

        if meeting.is_some() && fwd.min_pending() + bwd.min_pending() >= best_cost {
            break;
        }

        dir = match dir {
            Direction::Forward  => Direction::Backward,
            Direction::Backward => Direction::Forward,
        };
    }

    let Some(meeting) = meeting else {
        return Err(SpatialError::NoRoute { from: source, to: target });
    };

    let mut forward_path = fwd.trace(meeting);
    forward_path.reverse();
    let backward_path = bwd.trace(meeting);

    let mut path = forward_path.clone();
    path.extend_from_slice(&backward_path[1..]);

    Ok(MeetingRoute { path, best_cost, meeting, forward_path, backward_path })
}
