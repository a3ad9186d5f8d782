//! Time saved against a reference vehicle.
//!
//! For each best result the reference duration `d` (seconds) from station to
//! incident is looked up, then:
//!
//! | Column                 | Value                                  |
//! |------------------------|----------------------------------------|
//! | `duration_bus`         | `d / 60`                               |
//! | `duration_ambulance`   | `d * weight_factor / 60`               |
//! | `*_diff`               | that duration minus `total_time_min`   |
//! | `*_saving_percent`     | `diff / duration * 100`                |

use er_spatial::{DurationLookup, DurationSource, RoadNetwork};
use er_trial::DispatchResult;

use crate::row::SavingRow;

/// Build saving rows for `best`, in input order.
///
/// Lookups that come back unavailable are retried once after the first pass;
/// results still without a duration are left out and logged.
pub fn saving_analysis<S: DurationSource + ?Sized>(
    network: &RoadNetwork,
    best: &[DispatchResult],
    source: &mut S,
    weight_factor: f64,
) -> Vec<SavingRow> {
    let mut durations: Vec<Option<f64>> = vec![None; best.len()];

    for pass in 0..2 {
        for (slot, r) in durations.iter_mut().zip(best) {
            if slot.is_some() {
                continue;
            }
            let from = network.pos(r.station_node);
            let to = network.pos(r.goal);
            if let DurationLookup::Seconds(d) = source.lookup(from, to) {
                if d.is_finite() && d >= 0.0 {
                    *slot = Some(d);
                }
            }
        }
        let missing = durations.iter().filter(|d| d.is_none()).count();
        if missing == 0 {
            break;
        }
        if pass == 0 {
            log::info!("saving analysis: retrying {missing} unavailable reference durations");
        } else {
            log::warn!("saving analysis: {missing} results have no reference duration");
        }
    }

    best.iter()
        .zip(durations)
        .filter_map(|(r, d)| d.map(|d| saving_row(network, r, d, weight_factor)))
        .collect()
}

fn saving_row(network: &RoadNetwork, r: &DispatchResult, duration: f64, weight_factor: f64) -> SavingRow {
    let duration_bus = duration / 60.0;
    let duration_ambulance = duration * weight_factor / 60.0;
    let bus_diff = duration_bus - r.total_time_min;
    let ambulance_diff = duration_ambulance - r.total_time_min;
    let percent = |diff: f64, base: f64| (base > 0.0).then(|| diff / base * 100.0);

    SavingRow {
        trial: r.trial,
        station: r.station.clone(),
        goal: network.key(r.goal).to_owned(),
        total_time_min: r.total_time_min,
        duration,
        duration_bus,
        duration_ambulance,
        bus_diff,
        ambulance_diff,
        bus_saving_percent: percent(bus_diff, duration_bus),
        ambulance_saving_percent: percent(ambulance_diff, duration_ambulance),
    }
}
