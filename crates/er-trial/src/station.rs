//! Dispatch stations and how they are placed on the road network.

use er_core::{GeoPoint, NodeId};
use er_spatial::RoadNetwork;

use crate::{TrialError, TrialResult};

/// A station resolved to a road node.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub label: String,
    pub node:  NodeId,
}

/// Where a station sits, as given in a run file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StationLocation {
    /// An existing node identifier.
    Node(String),
    /// A coordinate, snapped to the nearest node.
    Coords(GeoPoint),
}

/// Unresolved station entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StationSpec {
    pub label:    String,
    pub location: StationLocation,
}

impl StationSpec {
    pub fn at_node(label: impl Into<String>, node: impl Into<String>) -> Self {
        Self { label: label.into(), location: StationLocation::Node(node.into()) }
    }

    pub fn at_coords(label: impl Into<String>, pos: GeoPoint) -> Self {
        Self { label: label.into(), location: StationLocation::Coords(pos) }
    }

    /// Place this station on `network`.
    pub fn resolve(&self, network: &RoadNetwork) -> TrialResult<Station> {
        let node = match &self.location {
            StationLocation::Node(key) => network.resolve(key)?,
            StationLocation::Coords(pos) => {
                let node = network.snap_to_node(*pos).ok_or_else(|| {
                    TrialError::Config(format!(
                        "cannot snap station {:?}: network has no nodes",
                        self.label
                    ))
                })?;
                log::debug!(
                    "station {:?} at {pos} snapped to node {} ({:.0} m away)",
                    self.label,
                    network.key(node),
                    pos.distance_m(network.pos(node)),
                );
                node
            }
        };
        Ok(Station { label: self.label.clone(), node })
    }
}

/// Resolve every spec in order.  Station order is preserved; it decides ties.
pub fn resolve_stations(network: &RoadNetwork, specs: &[StationSpec]) -> TrialResult<Vec<Station>> {
    specs.iter().map(|s| s.resolve(network)).collect()
}
