//! Per-station trial results.

use er_core::NodeId;

/// One station's route to one trial's incident.
///
/// Costs are in weighted seconds.  `total_cost` is the later of the two leg
/// arrivals, `max(forward_time, backward_time)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchResult {
    /// 1-based trial number.
    pub trial:          u32,
    pub station:        String,
    pub station_node:   NodeId,
    pub goal:           NodeId,
    pub meeting:        NodeId,
    pub forward_time:   f64,
    pub backward_time:  f64,
    pub total_cost:     f64,
    pub total_risk:     Option<f64>,
    /// Ranking value; equals `total_cost` in travel-time mode.
    pub score:          f64,
    pub total_time_min: f64,
    /// Station → meeting node.
    pub forward_path:   Vec<NodeId>,
    /// Meeting node → incident.
    pub backward_path:  Vec<NodeId>,
}

impl DispatchResult {
    /// Node count of the joined path; the meeting node counts once.
    pub fn path_length(&self) -> usize {
        self.forward_path.len() + self.backward_path.len() - 1
    }

    /// The full station → incident path.
    pub fn full_path(&self) -> Vec<NodeId> {
        let mut path = self.forward_path.clone();
        path.extend(self.backward_path.iter().skip(1));
        path
    }
}

/// Everything one run produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrialOutcome {
    /// Best station per trial, in trial order.  Trials where no station
    /// reached the incident are absent.
    pub best: Vec<DispatchResult>,
    /// Every station that reached its trial's incident, in (trial, station)
    /// order.
    pub all: Vec<DispatchResult>,
    /// Trials with no result at all.
    pub skipped_trials: Vec<u32>,
}
