//! Fluent builder for constructing a [`TrialSimulator`].

use er_core::{NodeId, ScoringMode, TrialConfig};
use er_spatial::{RiskIndex, RoadNetwork, Router};

use crate::scorer::{RiskScorer, RouteScorer, TravelTimeScorer};
use crate::station::{resolve_stations, StationSpec};
use crate::{TrialError, TrialResult, TrialSimulator};

/// Fluent builder for [`TrialSimulator<R>`].
///
/// # Required inputs
///
/// - [`TrialConfig`] — trial count, seed, search and scoring parameters
/// - `&RoadNetwork` — borrowed for the simulator's lifetime
/// - `R: Router` — usually [`er_spatial::BidirectionalRouter`] built from the
///   same config
/// - at least one station and one candidate goal
///
/// # Optional inputs
///
/// | Method            | Default                                        |
/// |-------------------|------------------------------------------------|
/// | `.risk_index(r)`  | none; required when `config.mode` is risk mode |
///
/// # Example
///
/// ```rust,ignore
/// let router = BidirectionalRouter::new(SearchParams::from(&config));
/// let sim = TrialSimBuilder::new(config, &network, router)
///     .stations(stations)
///     .goals(candidate_goals(&records))
///     .build()?;
/// let outcome = sim.run()?;
/// ```
pub struct TrialSimBuilder<'a, R: Router> {
    config:   TrialConfig,
    network:  &'a RoadNetwork,
    router:   R,
    stations: Vec<StationSpec>,
    goals:    Vec<String>,
    risk:     Option<&'a RiskIndex>,
}

impl<'a, R: Router> TrialSimBuilder<'a, R> {
    pub fn new(config: TrialConfig, network: &'a RoadNetwork, router: R) -> Self {
        Self {
            config,
            network,
            router,
            stations: Vec::new(),
            goals:    Vec::new(),
            risk:     None,
        }
    }

    /// Stations in tie-breaking order.
    pub fn stations(mut self, stations: Vec<StationSpec>) -> Self {
        self.stations = stations;
        self
    }

    /// Node identifiers incidents are drawn from, uniformly by position.
    /// A repeated identifier is drawn proportionally more often.
    pub fn goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    pub fn risk_index(mut self, risk: &'a RiskIndex) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Validate inputs, resolve stations and goals, and return a ready-to-run
    /// [`TrialSimulator`].
    pub fn build(self) -> TrialResult<TrialSimulator<'a, R>> {
        self.config.validate()?;

        if self.stations.is_empty() {
            return Err(TrialError::Config("at least one station is required".into()));
        }
        if self.goals.is_empty() {
            return Err(TrialError::NoGoals);
        }

        let stations = resolve_stations(self.network, &self.stations)?;
        let goals = self
            .goals
            .iter()
            .map(|g| self.network.resolve(g))
            .collect::<Result<Vec<NodeId>, _>>()?;

        let scorer: Box<dyn RouteScorer + 'a> = match self.config.mode {
            ScoringMode::TravelTime => Box::new(TravelTimeScorer),
            ScoringMode::RiskWeighted => {
                let index = self.risk.ok_or_else(|| {
                    TrialError::Config("risk-weighted mode needs a risk index".into())
                })?;
                Box::new(RiskScorer::new(self.config.alpha, index))
            }
        };

        Ok(TrialSimulator {
            config:  self.config,
            network: self.network,
            router:  self.router,
            scorer,
            stations,
            goals,
        })
    }
}
