//! Per-edge risk lookup for risk-weighted station scoring.

use std::collections::HashMap;

use er_core::NodeId;

use crate::loader::RiskRecord;
use crate::network::RoadNetwork;

/// Risk assigned per metre of segment length when no explicit `risk` is
/// recorded.
pub const RISK_PER_METRE: f64 = 0.1;

/// Directed edge → risk value.
///
/// Storage is directed, but [`total_risk`](Self::total_risk) treats risk as
/// direction-agnostic: a hop with no forward entry uses the reverse edge.
#[derive(Debug, Default, Clone)]
pub struct RiskIndex {
    risk: HashMap<(NodeId, NodeId), f64>,
    /// Edges that had neither `risk` nor `length` and were assigned 0.
    defaulted: usize,
}

impl RiskIndex {
    /// Build from risk records, resolving identifiers through `network`.
    ///
    /// Records whose endpoints are not in the network can never lie on a
    /// search path and are skipped.  A repeated `(u, v)` keeps the last value.
    pub fn from_records<'a, I>(network: &RoadNetwork, records: I) -> Self
    where
        I: IntoIterator<Item = &'a RiskRecord>,
    {
        let mut index = RiskIndex::default();
        let mut unresolved = 0usize;

        for r in records {
            let (Some(u), Some(v)) = (network.node_id(&r.u), network.node_id(&r.v)) else {
                unresolved += 1;
                continue;
            };
            let risk = match (r.risk, r.length) {
                (Some(risk), _) => risk,
                (None, Some(len)) => len * RISK_PER_METRE,
                (None, None) => {
                    index.defaulted += 1;
                    0.0
                }
            };
            index.risk.insert((u, v), risk);
        }

        if unresolved > 0 {
            log::debug!("risk index: skipped {unresolved} records with unknown endpoints");
        }
        if index.defaulted > 0 {
            log::warn!(
                "risk index: {} edges have neither risk nor length; scored as 0",
                index.defaulted
            );
        }
        index
    }

    pub fn len(&self) -> usize {
        self.risk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risk.is_empty()
    }

    /// Number of edges whose risk was defaulted to 0.
    pub fn defaulted_edges(&self) -> usize {
        self.defaulted
    }

    /// Stored risk of the directed edge `from → to`.
    pub fn edge_risk(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.risk.get(&(from, to)).copied()
    }

    /// Sum of hop risks along `path`.
    ///
    /// Each hop uses the forward entry, else the reverse entry, else 0.
    pub fn total_risk(&self, path: &[NodeId]) -> f64 {
        path.windows(2)
            .map(|w| {
                self.edge_risk(w[0], w[1])
                    .or_else(|| self.edge_risk(w[1], w[0]))
                    .unwrap_or(0.0)
            })
            .sum()
    }
}
