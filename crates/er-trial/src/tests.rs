//! Unit tests for er-trial.

#[cfg(test)]
mod helpers {
    use er_core::{GeoPoint, ScoringMode, TrialConfig};
    use er_spatial::{BidirectionalRouter, RiskIndex, RiskRecord, RoadNetwork, RoadNetworkBuilder, SearchParams};

    /// Three stations with one road each into incident node `G`:
    ///
    /// | station | weight | risk |
    /// |---------|--------|------|
    /// | A       | 10     | 40   |
    /// | B       | 15     | 10   |
    /// | C       | 20     | 0    |
    ///
    /// `Y → Z` is a separate component no station can reach.
    pub fn star() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let g = b.add_node("G", GeoPoint::new(127.00, 37.50));
        let a = b.add_node("A", GeoPoint::new(126.99, 37.50));
        let n_b = b.add_node("B", GeoPoint::new(127.01, 37.50));
        let c = b.add_node("C", GeoPoint::new(127.00, 37.51));
        let y = b.add_node("Y", GeoPoint::new(128.00, 36.00));
        let z = b.add_node("Z", GeoPoint::new(128.01, 36.00));
        b.add_edge(a, g, 20.0);
        b.add_edge(n_b, g, 30.0);
        b.add_edge(c, g, 40.0);
        b.add_edge(y, z, 20.0);
        b.build()
    }

    pub fn star_risk(net: &RoadNetwork) -> RiskIndex {
        let rec = |u: &str, risk: f64| RiskRecord {
            u:      u.into(),
            v:      "G".into(),
            length: None,
            risk:   Some(risk),
        };
        RiskIndex::from_records(net, &[rec("A", 40.0), rec("B", 10.0), rec("C", 0.0)])
    }

    pub fn config(mode: ScoringMode) -> TrialConfig {
        TrialConfig {
            num_trials:    3,
            seed:          7,
            max_time_diff: f64::INFINITY,
            weight_factor: 1.0,
            alpha:         0.5,
            mode,
        }
    }

    pub fn router(config: &TrialConfig) -> BidirectionalRouter {
        BidirectionalRouter::new(SearchParams::from(config))
    }

    pub fn abc() -> Vec<crate::StationSpec> {
        ["A", "B", "C"].iter().map(|s| crate::StationSpec::at_node(*s, *s)).collect()
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use er_core::{GeoPoint, ScoringMode};
    use er_spatial::SpatialError;

    use super::helpers::*;
    use crate::{StationSpec, TrialError, TrialSimBuilder};

    #[test]
    fn no_stations_is_config_error() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let r = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg)).goals(["G"]).build();
        assert!(matches!(r, Err(TrialError::Config(_))));
    }

    #[test]
    fn no_goals_is_rejected() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let r = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg)).stations(abc()).build();
        assert!(matches!(r, Err(TrialError::NoGoals)));
    }

    #[test]
    fn unknown_goal_is_rejected() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let r = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G", "nowhere"])
            .build();
        assert!(matches!(
            r,
            Err(TrialError::Spatial(SpatialError::UnknownNode(k))) if k == "nowhere"
        ));
    }

    #[test]
    fn unknown_station_node_is_rejected() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let r = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(vec![StationSpec::at_node("HQ", "missing")])
            .goals(["G"])
            .build();
        assert!(matches!(r, Err(TrialError::Spatial(SpatialError::UnknownNode(_)))));
    }

    #[test]
    fn risk_mode_needs_index() {
        let net = star();
        let cfg = config(ScoringMode::RiskWeighted);
        let r = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .build();
        assert!(matches!(r, Err(TrialError::Config(_))));
    }

    #[test]
    fn invalid_alpha_is_rejected() {
        let net = star();
        let mut cfg = config(ScoringMode::TravelTime);
        cfg.alpha = 1.5;
        let r = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .build();
        match r {
            Err(TrialError::Config(msg)) => assert!(msg.contains("alpha"), "{msg}"),
            _ => panic!("expected config error"),
        }
    }

    #[test]
    fn coordinate_station_snaps_to_nearest_node() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(vec![StationSpec::at_coords("near A", GeoPoint::new(126.9901, 37.5001))])
            .goals(["G"])
            .build()
            .unwrap();
        assert_eq!(sim.stations()[0].node, net.resolve("A").unwrap());
        assert_eq!(sim.stations()[0].label, "near A");
    }
}

// ── Scoring and best-station selection ────────────────────────────────────────

#[cfg(test)]
mod selection {
    use er_core::ScoringMode;

    use super::helpers::*;
    use crate::{StationSpec, TrialSimBuilder};

    #[test]
    fn travel_time_picks_cheapest_station() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .build()
            .unwrap();
        let out = sim.run().unwrap();

        assert_eq!(out.best.len(), 3);
        assert_eq!(out.all.len(), 9);
        assert!(out.skipped_trials.is_empty());
        for (i, b) in out.best.iter().enumerate() {
            assert_eq!(b.trial, i as u32 + 1);
            assert_eq!(b.station, "A");
            assert_eq!(b.forward_time, 10.0);
            assert_eq!(b.backward_time, 0.0);
            assert_eq!(b.total_cost, 10.0);
            assert_eq!(b.score, 10.0);
            assert_eq!(b.total_risk, None);
            assert!((b.total_time_min - 10.0 / 60.0).abs() < 1e-12);
            assert_eq!(b.path_length(), 2);
            assert_eq!(b.full_path(), vec![net.resolve("A").unwrap(), net.resolve("G").unwrap()]);
        }
    }

    #[test]
    fn risk_mode_minimises_blended_score() {
        let net = star();
        let risk = star_risk(&net);
        let cfg = config(ScoringMode::RiskWeighted);
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .risk_index(&risk)
            .build()
            .unwrap();
        let out = sim.run().unwrap();

        // A: 0.5*10 + 0.5*40 = 25, B: 0.5*15 + 0.5*10 = 12.5, C: 0.5*20 + 0 = 10.
        let scores: Vec<_> = out.all.iter().take(3).map(|r| (r.station.as_str(), r.score)).collect();
        assert_eq!(scores, [("A", 25.0), ("B", 12.5), ("C", 10.0)]);
        assert!(out.best.iter().all(|b| b.station == "C"));
        assert_eq!(out.best[0].total_risk, Some(0.0));
        assert_eq!(out.best[0].total_cost, 20.0);
    }

    #[test]
    fn alpha_one_reduces_to_travel_time() {
        let net = star();
        let risk = star_risk(&net);
        let mut cfg = config(ScoringMode::RiskWeighted);
        cfg.alpha = 1.0;
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .risk_index(&risk)
            .build()
            .unwrap();
        let out = sim.run().unwrap();
        assert!(out.best.iter().all(|b| b.station == "A"));
        assert_eq!(out.best[0].total_risk, Some(40.0));
    }

    #[test]
    fn tie_goes_to_earlier_station() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(vec![
                StationSpec::at_node("first", "A"),
                StationSpec::at_node("second", "A"),
            ])
            .goals(["G"])
            .build()
            .unwrap();
        let out = sim.run().unwrap();
        assert!(out.best.iter().all(|b| b.station == "first"));
        assert_eq!(out.all.len(), 6);
    }

    #[test]
    fn forward_factor_scales_forward_leg_only() {
        let net = star();
        let mut cfg = config(ScoringMode::TravelTime);
        cfg.weight_factor = 0.5;
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(vec![StationSpec::at_node("A", "A")])
            .goals(["G"])
            .build()
            .unwrap();
        let out = sim.run().unwrap();
        assert_eq!(out.best[0].forward_time, 5.0);
        assert_eq!(out.best[0].total_cost, 5.0);
    }
}

// ── Trial loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trials {
    use er_core::{NodeId, ScoringMode};
    use er_spatial::{MeetingRoute, RoadNetwork, Router, SpatialError, SpatialResult};

    use super::helpers::*;
    use crate::{DispatchResult, TrialError, TrialObserver, TrialOutcome, TrialSimBuilder};

    #[test]
    fn unreachable_goals_skip_their_trials() {
        let net = star();
        let mut cfg = config(ScoringMode::TravelTime);
        cfg.num_trials = 40;
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G", "Z"])
            .build()
            .unwrap();
        let draws = sim.draw_goals().unwrap();
        let out = sim.run().unwrap();

        let z = net.resolve("Z").unwrap();
        let expected_skips: Vec<u32> = draws
            .iter()
            .enumerate()
            .filter(|(_, g)| **g == z)
            .map(|(i, _)| i as u32 + 1)
            .collect();
        assert!(!expected_skips.is_empty(), "seed should draw Z at least once in 40 trials");
        assert_eq!(out.skipped_trials, expected_skips);
        assert_eq!(out.best.len() + out.skipped_trials.len(), 40);
        assert_eq!(out.all.len(), out.best.len() * 3);
        assert!(out.best.iter().all(|b| b.goal != z));
    }

    #[test]
    fn runs_are_deterministic() {
        let net = star();
        let mut cfg = config(ScoringMode::TravelTime);
        cfg.num_trials = 25;
        let build = || {
            TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
                .stations(abc())
                .goals(["G", "Z", "A"])
                .build()
                .unwrap()
        };
        let first = build().run().unwrap();
        let second = build().run().unwrap();
        assert_eq!(first, second);
        assert_eq!(build().draw_goals().unwrap().len(), 25);
    }

    /// Per-goal outcome on `star()` with stations A, B, C, in station order.
    fn fixed_table(goal: &str) -> Vec<(&'static str, f64)> {
        match goal {
            "G" => vec![("A", 10.0), ("B", 15.0), ("C", 20.0)],
            "A" => vec![("A", 0.0)],
            _ => vec![],
        }
    }

    /// Asserted identically with and without the `parallel` feature, so the
    /// two search paths must agree on results and their order.
    #[test]
    fn outcome_matches_fixed_table() {
        let net = star();
        let mut cfg = config(ScoringMode::TravelTime);
        cfg.num_trials = 25;
        let goals = ["G", "Z", "A"];
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(goals)
            .build()
            .unwrap();
        let out = sim.run().unwrap();

        let mut rng = er_core::TrialRng::new(cfg.seed);
        let mut want_all = Vec::new();
        let mut want_best = Vec::new();
        let mut want_skipped = Vec::new();
        for trial in 1..=25u32 {
            let goal = *rng.choose(&goals).unwrap();
            let rows = fixed_table(goal);
            match rows.first() {
                Some(&(station, cost)) => want_best.push((trial, station.to_owned(), goal.to_owned(), cost)),
                None => want_skipped.push(trial),
            }
            want_all.extend(rows.into_iter().map(|(st, cost)| (trial, st.to_owned(), cost)));
        }

        let got_best: Vec<_> = out
            .best
            .iter()
            .map(|r| (r.trial, r.station.clone(), net.key(r.goal).to_owned(), r.total_cost))
            .collect();
        let got_all: Vec<_> = out.all.iter().map(|r| (r.trial, r.station.clone(), r.total_cost)).collect();
        assert_eq!(got_best, want_best);
        assert_eq!(got_all, want_all);
        assert_eq!(out.skipped_trials, want_skipped);
    }

    #[test]
    fn station_at_goal_costs_zero() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["A"])
            .build()
            .unwrap();
        let out = sim.run().unwrap();
        // Only A reaches itself; B and C have no road to A.
        assert_eq!(out.all.len(), 3);
        assert_eq!(out.best[0].station, "A");
        assert_eq!(out.best[0].total_cost, 0.0);
        assert_eq!(out.best[0].path_length(), 1);
    }

    #[test]
    fn zero_trials_is_empty_outcome() {
        let net = star();
        let mut cfg = config(ScoringMode::TravelTime);
        cfg.num_trials = 0;
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .build()
            .unwrap();
        assert_eq!(sim.run().unwrap(), TrialOutcome::default());
    }

    /// Router that never finds anything.
    struct Nowhere;

    impl Router for Nowhere {
        fn find_path(&self, _: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<MeetingRoute> {
            Err(SpatialError::NoRoute { from, to })
        }
    }

    /// Router that fails as if the network were corrupt.
    struct Broken;

    impl Router for Broken {
        fn find_path(&self, _: &RoadNetwork, _: NodeId, to: NodeId) -> SpatialResult<MeetingRoute> {
            Err(SpatialError::NodeNotFound(to))
        }
    }

    #[test]
    fn no_route_anywhere_skips_every_trial() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg, &net, Nowhere)
            .stations(abc())
            .goals(["G"])
            .build()
            .unwrap();
        let out = sim.run().unwrap();
        assert!(out.best.is_empty());
        assert!(out.all.is_empty());
        assert_eq!(out.skipped_trials, [1, 2, 3]);
    }

    #[test]
    fn other_router_errors_propagate() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg, &net, Broken)
            .stations(abc())
            .goals(["G"])
            .build()
            .unwrap();
        assert!(matches!(
            sim.run(),
            Err(TrialError::Spatial(SpatialError::NodeNotFound(_)))
        ));
    }

    #[derive(Default)]
    struct Counter {
        started:  u32,
        results:  usize,
        best:     Vec<Option<String>>,
        finished: Option<(usize, usize)>,
    }

    impl TrialObserver for Counter {
        fn on_trial_start(&mut self, _trial: u32, _goal: NodeId) {
            self.started += 1;
        }
        fn on_station_result(&mut self, _result: &DispatchResult) {
            self.results += 1;
        }
        fn on_trial_end(&mut self, _trial: u32, best: Option<&DispatchResult>) {
            self.best.push(best.map(|b| b.station.clone()));
        }
        fn on_run_end(&mut self, completed: usize, skipped: usize) {
            self.finished = Some((completed, skipped));
        }
    }

    #[test]
    fn observer_sees_every_trial_in_order() {
        let net = star();
        let cfg = config(ScoringMode::TravelTime);
        let sim = TrialSimBuilder::new(cfg.clone(), &net, router(&cfg))
            .stations(abc())
            .goals(["G"])
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run_with(&mut obs).unwrap();
        assert_eq!(obs.started, 3);
        assert_eq!(obs.results, 9);
        assert_eq!(obs.best, vec![Some("A".to_string()); 3]);
        assert_eq!(obs.finished, Some((3, 0)));
    }
}
