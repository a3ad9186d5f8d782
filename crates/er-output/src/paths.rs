//! JSON polyline export for map overlays.
//!
//! The file is a JSON array with one object per result:
//!
//! ```json
//! [{ "trial": 1, "station": "HQ", "goal": "7257925078", "meeting": "2330782485",
//!    "forward":  [[126.95, 37.55], [126.96, 37.55]],
//!    "backward": [[126.96, 37.55], [126.97, 37.56]] }]
//! ```
//!
//! Coordinates are `[lon, lat]` pairs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use er_core::NodeId;
use er_spatial::RoadNetwork;
use er_trial::DispatchResult;
use serde::Serialize;

use crate::OutputResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathExport {
    pub trial:    u32,
    pub station:  String,
    pub goal:     String,
    pub meeting:  String,
    pub forward:  Vec<[f64; 2]>,
    pub backward: Vec<[f64; 2]>,
}

impl PathExport {
    pub fn from_result(network: &RoadNetwork, result: &DispatchResult) -> Self {
        Self {
            trial:    result.trial,
            station:  result.station.clone(),
            goal:     network.key(result.goal).to_owned(),
            meeting:  network.key(result.meeting).to_owned(),
            forward:  polyline(network, &result.forward_path),
            backward: polyline(network, &result.backward_path),
        }
    }
}

fn polyline(network: &RoadNetwork, path: &[NodeId]) -> Vec<[f64; 2]> {
    path.iter()
        .map(|&n| {
            let p = network.pos(n);
            [p.lon, p.lat]
        })
        .collect()
}

/// Serialize `results` as pretty JSON to `writer`.
pub fn write_paths_json<W: Write>(
    writer: W,
    network: &RoadNetwork,
    results: &[DispatchResult],
) -> OutputResult<()> {
    let exports: Vec<PathExport> =
        results.iter().map(|r| PathExport::from_result(network, r)).collect();
    serde_json::to_writer_pretty(writer, &exports)?;
    Ok(())
}

/// Write `results` to `path`, creating or truncating it.
pub fn export_paths_json(
    path: &Path,
    network: &RoadNetwork,
    results: &[DispatchResult],
) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_paths_json(&mut out, network, results)?;
    out.flush()?;
    log::info!("wrote {} paths to {}", results.len(), path.display());
    Ok(())
}
