//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use er_core::{GeoPoint, ScoringMode, TrialConfig};
use er_trial::StationSpec;

#[derive(Parser)]
#[command(author, version, about = "Dispatch-station trials over a directed road network", long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// run trials over an edge CSV
    Run(RunArgs),
    /// run trials over a built-in synthetic network
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// edge CSV with columns u, v, u_x, u_y, v_x, v_y, duration (risk, length optional)
    pub edges: PathBuf,

    /// separate risk CSV (u, v, length, risk); defaults to the edge CSV's own columns
    #[arg(long)]
    pub risk: Option<PathBuf>,

    /// JSON run file with `trial`, `stations`, and optional `goals`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// station as LABEL=NODE or LABEL=@LON,LAT; repeatable, appended after run-file stations
    #[arg(long = "station", value_parser = parse_station)]
    pub stations: Vec<StationSpec>,

    #[command(flatten)]
    pub params: ParamArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct DemoArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Overrides applied on top of defaults and the run file.
#[derive(Args, Default)]
pub struct ParamArgs {
    /// number of trials
    #[arg(long)]
    pub trials: Option<u32>,
    /// goal-draw seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// max gap in seconds between forward and backward arrival at the meeting node
    #[arg(long)]
    pub max_time_diff: Option<f64>,
    /// forward-search edge weight multiplier
    #[arg(long)]
    pub weight_factor: Option<f64>,
    /// travel-cost share of the risk-weighted score, in [0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,
    /// rank stations by alpha * cost + (1 - alpha) * risk
    #[arg(long)]
    pub risk_mode: bool,
}

impl ParamArgs {
    pub fn apply(&self, config: &mut TrialConfig) {
        if let Some(n) = self.trials {
            config.num_trials = n;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        if let Some(d) = self.max_time_diff {
            config.max_time_diff = d;
        }
        if let Some(f) = self.weight_factor {
            config.weight_factor = f;
        }
        if let Some(a) = self.alpha {
            config.alpha = a;
        }
        if self.risk_mode {
            config.mode = ScoringMode::RiskWeighted;
        }
    }
}

#[derive(Args)]
pub struct OutputArgs {
    /// directory for best.csv, all.csv, savings.csv, and paths.json
    #[arg(long, default_value = "output/dispatch")]
    pub output_dir: PathBuf,

    /// reference vehicle speed for the saving analysis; skipped when absent
    #[arg(long)]
    pub reference_speed_kmh: Option<f64>,

    /// write output.db instead of CSV files
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    pub sqlite: bool,
}

/// `LABEL=NODE` or `LABEL=@LON,LAT`.
pub fn parse_station(s: &str) -> Result<StationSpec, String> {
    let (label, location) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=NODE or LABEL=@LON,LAT, got {s:?}"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("empty station label in {s:?}"));
    }

    match location.trim().strip_prefix('@') {
        Some(coords) => {
            let (lon, lat) = coords
                .split_once(',')
                .ok_or_else(|| format!("expected @LON,LAT, got {location:?}"))?;
            let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
            let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
            Ok(StationSpec::at_coords(label, GeoPoint::new(lon, lat)))
        }
        None if location.trim().is_empty() => Err(format!("empty node id in {s:?}")),
        None => Ok(StationSpec::at_node(label, location.trim())),
    }
}

#[cfg(test)]
mod tests {
    use er_trial::StationLocation;

    use super::*;

    #[test]
    fn station_by_node() {
        let s = parse_station("Mapo 119=8477574118").unwrap();
        assert_eq!(s.label, "Mapo 119");
        assert_eq!(s.location, StationLocation::Node("8477574118".into()));
    }

    #[test]
    fn station_by_coords() {
        let s = parse_station("HQ=@126.95, 37.55").unwrap();
        assert_eq!(s.location, StationLocation::Coords(GeoPoint::new(126.95, 37.55)));
    }

    #[test]
    fn malformed_stations() {
        assert!(parse_station("no-separator").is_err());
        assert!(parse_station("=123").is_err());
        assert!(parse_station("x=").is_err());
        assert!(parse_station("x=@126.9").is_err());
        assert!(parse_station("x=@east,37.5").is_err());
    }

    #[test]
    fn overrides_apply() {
        let mut config = TrialConfig::default();
        let params = ParamArgs { trials: Some(5), alpha: Some(0.25), risk_mode: true, ..Default::default() };
        params.apply(&mut config);
        assert_eq!(config.num_trials, 5);
        assert_eq!(config.alpha, 0.25);
        assert_eq!(config.mode, ScoringMode::RiskWeighted);
        assert_eq!(config.seed, 42);
    }
}
