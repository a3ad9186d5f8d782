//! The `TrialSimulator` and its run loop.

use er_core::{NodeId, TrialConfig, TrialRng};
use er_spatial::{leg_cost, RoadNetwork, Router, SpatialError};

use crate::scorer::RouteScorer;
use crate::station::Station;
use crate::{
    DispatchResult, NoopObserver, TrialError, TrialObserver, TrialOutcome, TrialResult,
};

/// Runs a batch of dispatch trials.
///
/// A run has three phases:
///
/// 1. **Draw** (sequential): one incident node per trial, drawn uniformly
///    with replacement from the candidate goals using a `TrialRng` seeded
///    from `config.seed`.
/// 2. **Search** (parallel with the `parallel` feature): one routed search
///    per (trial, station).  A `NoRoute` outcome makes that station
///    ineligible for that trial.
/// 3. **Reduce** (sequential, trial order): pick the lowest-scoring station
///    per trial; the earlier station wins a tie.
///
/// Create via [`TrialSimBuilder`][crate::TrialSimBuilder].
pub struct TrialSimulator<'a, R: Router> {
    pub(crate) config:   TrialConfig,
    pub(crate) network:  &'a RoadNetwork,
    pub(crate) router:   R,
    pub(crate) scorer:   Box<dyn RouteScorer + 'a>,
    pub(crate) stations: Vec<Station>,
    pub(crate) goals:    Vec<NodeId>,
}

impl<'a, R: Router> TrialSimulator<'a, R> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    pub fn network(&self) -> &'a RoadNetwork {
        self.network
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn goals(&self) -> &[NodeId] {
        &self.goals
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Incident node for each trial, in trial order.
    ///
    /// Depends only on the seed and the goal list, so repeated calls agree.
    pub fn draw_goals(&self) -> TrialResult<Vec<NodeId>> {
        let mut rng = TrialRng::new(self.config.seed);
        (0..self.config.num_trials)
            .map(|_| rng.choose(&self.goals).copied().ok_or(TrialError::NoGoals))
            .collect()
    }

    pub fn run(&self) -> TrialResult<TrialOutcome> {
        self.run_with(&mut NoopObserver)
    }

    /// Run every trial, reporting progress to `observer`.
    pub fn run_with<O: TrialObserver>(&self, observer: &mut O) -> TrialResult<TrialOutcome> {
        let draws = self.draw_goals()?;
        log::info!(
            "running {} trials: {} stations, {} candidate goals, mode {:?}",
            draws.len(),
            self.stations.len(),
            self.goals.len(),
            self.config.mode,
        );

        let results = self.search_all(&draws)?;

        let mut outcome = TrialOutcome::default();
        let mut pending = results.into_iter();
        for (i, &goal) in draws.iter().enumerate() {
            let trial = i as u32 + 1;
            observer.on_trial_start(trial, goal);

            let found: Vec<DispatchResult> =
                pending.by_ref().take(self.stations.len()).flatten().collect();
            for r in &found {
                observer.on_station_result(r);
            }

            match best_index(&found) {
                Some(b) => {
                    let best = &found[b];
                    log::debug!(
                        "trial {trial}: goal {} best {} (cost {:.2}, score {:.2})",
                        self.network.key(goal),
                        best.station,
                        best.total_cost,
                        best.score,
                    );
                    observer.on_trial_end(trial, Some(best));
                    outcome.best.push(best.clone());
                }
                None => {
                    log::debug!(
                        "trial {trial}: no station reaches goal {}; skipped",
                        self.network.key(goal)
                    );
                    observer.on_trial_end(trial, None);
                    outcome.skipped_trials.push(trial);
                }
            }
            outcome.all.extend(found);
        }

        log::info!(
            "trials done: {} with a result, {} skipped",
            outcome.best.len(),
            outcome.skipped_trials.len()
        );
        observer.on_run_end(outcome.best.len(), outcome.skipped_trials.len());
        Ok(outcome)
    }

    // ── Search phase ──────────────────────────────────────────────────────

    /// One entry per (trial, station), trial-major.
    fn search_all(&self, draws: &[NodeId]) -> TrialResult<Vec<Option<DispatchResult>>> {
        let n_st = self.stations.len();
        let units: Vec<(usize, usize)> = (0..draws.len())
            .flat_map(|t| (0..n_st).map(move |s| (t, s)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        {
            units
                .iter()
                .map(|&(t, s)| self.evaluate(t as u32 + 1, draws[t], &self.stations[s]))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Indexed collect keeps (trial, station) order.
            units
                .par_iter()
                .map(|&(t, s)| self.evaluate(t as u32 + 1, draws[t], &self.stations[s]))
                .collect()
        }
    }

    /// Route `station` to `goal` and score it.  `Ok(None)` means no route.
    fn evaluate(
        &self,
        trial:   u32,
        goal:    NodeId,
        station: &Station,
    ) -> TrialResult<Option<DispatchResult>> {
        let route = match self.router.find_path(self.network, station.node, goal) {
            Ok(route) => route,
            Err(SpatialError::NoRoute { .. }) => {
                log::trace!("trial {trial}: {} cannot reach goal", station.label);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let forward_time = leg_cost(self.network, &route.forward_path, self.config.weight_factor);
        let backward_time = leg_cost(self.network, &route.backward_path, 1.0);
        let total_cost = forward_time.max(backward_time);
        let score = self.scorer.score(total_cost, &route.forward_path);

        Ok(Some(DispatchResult {
            trial,
            station:        station.label.clone(),
            station_node:   station.node,
            goal,
            meeting:        route.meeting,
            forward_time,
            backward_time,
            total_cost,
            total_risk:     score.total_risk,
            score:          score.value,
            total_time_min: total_cost / 60.0,
            forward_path:   route.forward_path,
            backward_path:  route.backward_path,
        }))
    }
}

/// Index of the lowest score; the first one wins a tie.
fn best_index(results: &[DispatchResult]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, r) in results.iter().enumerate() {
        if best.is_none_or(|b| r.score < results[b].score) {
            best = Some(i);
        }
    }
    best
}
