//! dispatch — run dispatch-station trials and write the results.
//!
//! ```text
//! dispatch run edges.csv --station "HQ=7257925078" --trials 50
//! dispatch run edges.csv --config run.json --risk-mode --alpha 0.5
//! dispatch demo --reference-speed-kmh 30
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-trial
//! lines.

mod cli;
mod network;
mod reference;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;

use er_core::{ScoringMode, TrialConfig};
use er_output::{
    CsvWriter, OutputObserver, OutputWriter, export_paths_json, saving_analysis,
};
use er_spatial::{
    BidirectionalRouter, EdgeRecord, RiskIndex, RiskRecord, RoadNetwork, Router, SearchParams,
    build_network, candidate_goals, load_edges_csv, load_risk_csv,
};
use er_trial::{StationSpec, TrialSimBuilder, TrialSimulator};

use cli::{CliArgs, Command, DemoArgs, OutputArgs, RunArgs};
use network::{demo_edges, demo_stations};
use reference::StraightLineSource;

// ── Run file ──────────────────────────────────────────────────────────────────

/// Optional JSON run file.  Every field may be omitted.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RunFile {
    trial:    TrialConfig,
    stations: Vec<StationSpec>,
    /// Overrides the default goal set (distinct edge destinations).
    goals:    Option<Vec<String>>,
}

fn load_run_file(path: &Path) -> Result<RunFile> {
    let file = File::open(path).with_context(|| format!("opening run file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing run file {}", path.display()))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();
    match args.command {
        Command::Run(run) => run_from_files(run),
        Command::Demo(demo) => run_demo(demo),
    }
}

fn run_from_files(args: RunArgs) -> Result<()> {
    let mut run_file = match &args.config {
        Some(path) => load_run_file(path)?,
        None => RunFile::default(),
    };
    args.params.apply(&mut run_file.trial);
    run_file.stations.extend(args.stations.iter().cloned());
    if run_file.stations.is_empty() {
        bail!("no stations given; use --station LABEL=NODE or a run file");
    }

    let t0 = Instant::now();
    let records = load_edges_csv(&args.edges)
        .with_context(|| format!("loading edges from {}", args.edges.display()))?;
    let network = build_network(&records);
    log::info!(
        "network: {} nodes, {} edges ({:.2} s)",
        network.node_count(),
        network.edge_count(),
        t0.elapsed().as_secs_f64()
    );

    let goals = run_file.goals.take().unwrap_or_else(|| candidate_goals(&records));

    let risk = match run_file.trial.mode {
        ScoringMode::TravelTime => None,
        ScoringMode::RiskWeighted => Some(match &args.risk {
            Some(path) => {
                let rows = load_risk_csv(path)
                    .with_context(|| format!("loading risk from {}", path.display()))?;
                RiskIndex::from_records(&network, &rows)
            }
            None => risk_from_edges(&network, &records),
        }),
    };

    execute(&network, run_file.trial, run_file.stations, goals, risk.as_ref(), &args.output)
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let records = demo_edges();
    let network = build_network(&records);

    let mut config = TrialConfig::default();
    args.params.apply(&mut config);

    let risk = (config.mode == ScoringMode::RiskWeighted).then(|| risk_from_edges(&network, &records));
    let goals = candidate_goals(&records);

    execute(&network, config, demo_stations(), goals, risk.as_ref(), &args.output)
}

fn risk_from_edges(network: &RoadNetwork, records: &[EdgeRecord]) -> RiskIndex {
    let rows: Vec<RiskRecord> = records.iter().map(RiskRecord::from).collect();
    RiskIndex::from_records(network, &rows)
}

// ── Shared driver ─────────────────────────────────────────────────────────────

fn execute(
    network:  &RoadNetwork,
    config:   TrialConfig,
    stations: Vec<StationSpec>,
    goals:    Vec<String>,
    risk:     Option<&RiskIndex>,
    output:   &OutputArgs,
) -> Result<()> {
    let router = BidirectionalRouter::new(SearchParams::from(&config));
    let mut builder = TrialSimBuilder::new(config, network, router)
        .stations(stations)
        .goals(goals);
    if let Some(risk) = risk {
        builder = builder.risk_index(risk);
    }
    let sim = builder.build()?;

    std::fs::create_dir_all(&output.output_dir)
        .with_context(|| format!("creating {}", output.output_dir.display()))?;

    #[cfg(feature = "sqlite")]
    {
        if output.sqlite {
            let writer = er_output::SqliteWriter::new(&output.output_dir)?;
            return run_and_write(&sim, writer, output);
        }
    }

    let writer = CsvWriter::new(&output.output_dir)?;
    run_and_write(&sim, writer, output)
}

fn run_and_write<R: Router, W: OutputWriter>(
    sim:    &TrialSimulator<'_, R>,
    writer: W,
    output: &OutputArgs,
) -> Result<()> {
    let network = sim.network();
    let mut obs = OutputObserver::new(writer, network);

    let t0 = Instant::now();
    let outcome = sim.run_with(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.take_error() {
        return Err(e).context("writing results");
    }
    let mut writer = obs.into_writer();

    if let Some(kmh) = output.reference_speed_kmh {
        let mut source = StraightLineSource::new(kmh);
        let rows = saving_analysis(network, &outcome.best, &mut source, sim.config().weight_factor);
        writer.write_savings(&rows)?;
        log::info!("saving analysis: {} rows at {kmh} km/h", rows.len());
    }
    writer.finish()?;
    export_paths_json(&output.output_dir.join("paths.json"), network, &outcome.best)?;

    println!("Trials complete in {:.3} s", elapsed.as_secs_f64());
    println!("{:<6} {:<24} {:<14} {:>10} {:>8}", "Trial", "Station", "Goal", "Cost", "Min");
    println!("{}", "-".repeat(66));
    for b in &outcome.best {
        println!(
            "{:<6} {:<24} {:<14} {:>10.2} {:>8.2}",
            b.trial,
            b.station,
            network.key(b.goal),
            b.total_cost,
            b.total_time_min,
        );
    }
    if !outcome.skipped_trials.is_empty() {
        println!("Skipped trials (no station reached the incident): {:?}", outcome.skipped_trials);
    }
    println!("Results written to {}", output.output_dir.display());
    Ok(())
}
