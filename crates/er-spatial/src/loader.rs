//! Tabular edge-record loading.
//!
//! # CSV format
//!
//! One row per directed road segment.  Extra columns (OSM tags, geometry,
//! etc.) are ignored.
//!
//! ```csv
//! u,v,u_x,u_y,v_x,v_y,duration,length,risk
//! 7257925078,2330782485,126.9512,37.5581,126.9533,37.5570,84.0,312.5,
//! 2330782485,7257925078,126.9533,37.5570,126.9512,37.5581,91.0,312.5,4.2
//! ```
//!
//! | Column             | Required | Meaning                                  |
//! |--------------------|----------|------------------------------------------|
//! | `u`, `v`           | yes      | node identifiers (trimmed)               |
//! | `u_x`,`u_y`,`v_x`,`v_y` | yes | endpoint longitude / latitude           |
//! | `duration`         | yes      | recorded travel time, seconds, ≥ 0       |
//! | `length`           | no       | metres; source of the default risk       |
//! | `risk`             | no       | explicit per-edge risk                   |
//!
//! A row missing a required field fails the whole load with
//! [`SpatialError::MalformedInput`]; rows are never silently dropped.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use er_core::GeoPoint;

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// A validated directed edge record.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub u:        String,
    pub v:        String,
    pub u_pos:    GeoPoint,
    pub v_pos:    GeoPoint,
    pub duration: f64,
    pub length:   Option<f64>,
    pub risk:     Option<f64>,
}

/// The subset of an edge row the risk index needs.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskRecord {
    pub u:      String,
    pub v:      String,
    pub length: Option<f64>,
    pub risk:   Option<f64>,
}

impl From<&EdgeRecord> for RiskRecord {
    fn from(r: &EdgeRecord) -> Self {
        RiskRecord { u: r.u.clone(), v: r.v.clone(), length: r.length, risk: r.risk }
    }
}

#[derive(Deserialize)]
struct RawEdgeRow {
    #[serde(default)]
    u:        Option<String>,
    #[serde(default)]
    v:        Option<String>,
    #[serde(default)]
    u_x:      Option<f64>,
    #[serde(default)]
    u_y:      Option<f64>,
    #[serde(default)]
    v_x:      Option<f64>,
    #[serde(default)]
    v_y:      Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    length:   Option<f64>,
    #[serde(default)]
    risk:     Option<f64>,
}

#[derive(Deserialize)]
struct RawRiskRow {
    #[serde(default)]
    u:      Option<String>,
    #[serde(default)]
    v:      Option<String>,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    risk:   Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and validate edge records from a CSV file.
pub fn load_edges_csv(path: &Path) -> SpatialResult<Vec<EdgeRecord>> {
    let file = std::fs::File::open(path)?;
    read_edge_records(file)
}

/// Like [`load_edges_csv`] but accepts any `Read` source.
pub fn read_edge_records<R: Read>(reader: R) -> SpatialResult<Vec<EdgeRecord>> {
    let mut rdr = csv_reader(reader);
    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<RawEdgeRow>().enumerate() {
        let row_no = i + 1;
        let raw = row.map_err(|e| malformed(row_no, e.to_string()))?;
        records.push(validate_edge(raw, row_no)?);
    }
    log::debug!("read {} edge records", records.len());
    Ok(records)
}

/// Read risk records (`u`, `v`, optional `risk` / `length`) from a CSV file.
///
/// The risk table may come from a different export than the duration table,
/// so only the identifier columns are required.
pub fn load_risk_csv(path: &Path) -> SpatialResult<Vec<RiskRecord>> {
    let file = std::fs::File::open(path)?;
    read_risk_records(file)
}

pub fn read_risk_records<R: Read>(reader: R) -> SpatialResult<Vec<RiskRecord>> {
    let mut rdr = csv_reader(reader);
    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<RawRiskRow>().enumerate() {
        let row_no = i + 1;
        let raw = row.map_err(|e| malformed(row_no, e.to_string()))?;
        records.push(RiskRecord {
            u:      required_id(raw.u, "u", row_no)?,
            v:      required_id(raw.v, "v", row_no)?,
            length: raw.length,
            risk:   raw.risk,
        });
    }
    Ok(records)
}

/// Build the directed graph from validated records.
///
/// Every `u` endpoint is registered before any `v` endpoint, each in record
/// order, and the first position seen wins.  A node's `u`-column position
/// therefore beats an earlier `v`-column one.  Every record then inserts
/// exactly one directed edge `u → v`.
pub fn build_network(records: &[EdgeRecord]) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::with_capacity(records.len(), records.len());
    for r in records {
        b.add_node(&r.u, r.u_pos);
    }
    for r in records {
        b.add_node(&r.v, r.v_pos);
    }
    for r in records {
        let (Some(u), Some(v)) = (b.node_id(&r.u), b.node_id(&r.v)) else {
            continue;
        };
        b.add_edge(u, v, r.duration);
    }
    let net = b.build();
    log::info!(
        "road network: {} nodes, {} edges (from {} records)",
        net.node_count(),
        net.edge_count(),
        records.len()
    );
    net
}

/// Distinct edge destinations in first-appearance order.
///
/// This is the default incident-location pool when no explicit candidate
/// list is configured.
pub fn candidate_goals(records: &[EdgeRecord]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|r| seen.insert(r.v.as_str()))
        .map(|r| r.v.clone())
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn malformed(row: usize, reason: impl Into<String>) -> SpatialError {
    SpatialError::MalformedInput { row, reason: reason.into() }
}

fn required_id(value: Option<String>, field: &str, row: usize) -> SpatialResult<String> {
    match value.map(|s| s.trim().to_owned()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(malformed(row, format!("missing `{field}`"))),
    }
}

fn required_num(value: Option<f64>, field: &str, row: usize) -> SpatialResult<f64> {
    match value {
        Some(x) if x.is_finite() => Ok(x),
        Some(x) => Err(malformed(row, format!("`{field}` is not finite ({x})"))),
        None => Err(malformed(row, format!("missing `{field}`"))),
    }
}

fn validate_edge(raw: RawEdgeRow, row: usize) -> SpatialResult<EdgeRecord> {
    let u = required_id(raw.u, "u", row)?;
    let v = required_id(raw.v, "v", row)?;
    let duration = required_num(raw.duration, "duration", row)?;
    if duration < 0.0 {
        return Err(malformed(row, format!("negative `duration` ({duration})")));
    }
    let u_pos = GeoPoint::new(required_num(raw.u_x, "u_x", row)?, required_num(raw.u_y, "u_y", row)?);
    let v_pos = GeoPoint::new(required_num(raw.v_x, "v_x", row)?, required_num(raw.v_y, "v_y", row)?);
    Ok(EdgeRecord { u, v, u_pos, v_pos, duration, length: raw.length, risk: raw.risk })
}
