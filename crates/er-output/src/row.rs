//! Flat row types written by output backends.
//!
//! Rows keep full precision; backends round to two decimals when rendering.

use er_spatial::RoadNetwork;
use er_trial::DispatchResult;

use crate::aggregate::Summary;

/// Separator between node identifiers in a rendered path.
pub const PATH_SEPARATOR: &str = " → ";

/// Label of the synthetic summary row.
pub const AVERAGE_LABEL: &str = "average";

/// `u` is the station node, `v` the goal.
pub const RESULT_HEADER: [&str; 19] = [
    "trial",
    "station",
    "station_node",
    "goal",
    "meeting",
    "u_x",
    "u_y",
    "v_x",
    "v_y",
    "forward_time",
    "backward_time",
    "total_cost",
    "total_risk",
    "score",
    "total_time_min",
    "path_length",
    "path",
    "forward_path",
    "backward_path",
];

pub const SAVING_HEADER: [&str; 11] = [
    "trial",
    "station",
    "goal",
    "total_time_min",
    "duration",
    "duration_bus",
    "duration_ambulance",
    "bus_diff",
    "ambulance_diff",
    "bus_saving_percent",
    "ambulance_saving_percent",
];

/// One per-station result, or the trailing `average` record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Trial number, or [`AVERAGE_LABEL`].
    pub trial:          String,
    pub station:        Option<String>,
    pub station_node:   Option<String>,
    pub goal:           Option<String>,
    pub meeting:        Option<String>,
    /// Station position, `[lon, lat]`.
    pub origin:         Option<[f64; 2]>,
    /// Goal position, `[lon, lat]`.
    pub destination:    Option<[f64; 2]>,
    pub forward_time:   f64,
    pub backward_time:  f64,
    pub total_cost:     f64,
    pub total_risk:     Option<f64>,
    pub score:          f64,
    pub total_time_min: f64,
    /// A mean in the summary row, hence `f64`.
    pub path_length:    f64,
    pub path:           Option<String>,
    pub forward_path:   Option<String>,
    pub backward_path:  Option<String>,
}

impl ResultRow {
    /// Render `result` with node identifiers looked up in `network`.
    pub fn from_result(network: &RoadNetwork, result: &DispatchResult) -> Self {
        let lon_lat = |n: er_core::NodeId| {
            let p = network.pos(n);
            [p.lon, p.lat]
        };
        Self {
            trial:          result.trial.to_string(),
            station:        Some(result.station.clone()),
            station_node:   Some(network.key(result.station_node).to_owned()),
            goal:           Some(network.key(result.goal).to_owned()),
            meeting:        Some(network.key(result.meeting).to_owned()),
            origin:         Some(lon_lat(result.station_node)),
            destination:    Some(lon_lat(result.goal)),
            forward_time:   result.forward_time,
            backward_time:  result.backward_time,
            total_cost:     result.total_cost,
            total_risk:     result.total_risk,
            score:          result.score,
            total_time_min: result.total_time_min,
            path_length:    result.path_length() as f64,
            path:           Some(render_path(network, &result.full_path())),
            forward_path:   Some(render_path(network, &result.forward_path)),
            backward_path:  Some(render_path(network, &result.backward_path)),
        }
    }

    /// The `average` record; non-numeric columns stay empty.
    pub fn average(summary: &Summary) -> Self {
        Self {
            trial:          AVERAGE_LABEL.to_owned(),
            station:        None,
            station_node:   None,
            goal:           None,
            meeting:        None,
            origin:         None,
            destination:    None,
            forward_time:   summary.forward_time,
            backward_time:  summary.backward_time,
            total_cost:     summary.total_cost,
            total_risk:     summary.total_risk,
            score:          summary.score,
            total_time_min: summary.total_time_min,
            path_length:    summary.path_length,
            path:           None,
            forward_path:   None,
            backward_path:  None,
        }
    }

    /// Column values in [`RESULT_HEADER`] order.  Coordinates are written
    /// unrounded.
    pub fn to_record(&self) -> [String; 19] {
        let coord = |p: Option<[f64; 2]>, i: usize| p.map(|p| p[i].to_string()).unwrap_or_default();
        [
            self.trial.clone(),
            self.station.clone().unwrap_or_default(),
            self.station_node.clone().unwrap_or_default(),
            self.goal.clone().unwrap_or_default(),
            self.meeting.clone().unwrap_or_default(),
            coord(self.origin, 0),
            coord(self.origin, 1),
            coord(self.destination, 0),
            coord(self.destination, 1),
            fmt2(self.forward_time),
            fmt2(self.backward_time),
            fmt2(self.total_cost),
            self.total_risk.map(fmt2).unwrap_or_default(),
            fmt2(self.score),
            fmt2(self.total_time_min),
            fmt2(self.path_length),
            self.path.clone().unwrap_or_default(),
            self.forward_path.clone().unwrap_or_default(),
            self.backward_path.clone().unwrap_or_default(),
        ]
    }
}

/// Reference-duration comparison for one best result.  All durations in
/// minutes except `duration` (seconds, as returned by the source).
#[derive(Debug, Clone, PartialEq)]
pub struct SavingRow {
    pub trial:                    u32,
    pub station:                  String,
    pub goal:                     String,
    pub total_time_min:           f64,
    pub duration:                 f64,
    pub duration_bus:             f64,
    pub duration_ambulance:       f64,
    pub bus_diff:                 f64,
    pub ambulance_diff:           f64,
    /// `None` when the reference duration is 0.
    pub bus_saving_percent:       Option<f64>,
    pub ambulance_saving_percent: Option<f64>,
}

impl SavingRow {
    pub fn to_record(&self) -> [String; 11] {
        [
            self.trial.to_string(),
            self.station.clone(),
            self.goal.clone(),
            fmt2(self.total_time_min),
            fmt2(self.duration),
            fmt2(self.duration_bus),
            fmt2(self.duration_ambulance),
            fmt2(self.bus_diff),
            fmt2(self.ambulance_diff),
            self.bus_saving_percent.map(fmt2).unwrap_or_default(),
            self.ambulance_saving_percent.map(fmt2).unwrap_or_default(),
        ]
    }
}

/// Round half away from zero to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn fmt2(x: f64) -> String {
    round2(x).to_string()
}

/// `a → b → c`.
pub fn render_path(network: &RoadNetwork, path: &[er_core::NodeId]) -> String {
    path.iter()
        .map(|&n| network.key(n))
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}
