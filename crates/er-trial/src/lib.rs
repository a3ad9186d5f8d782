//! `er-trial` — trial simulator for the rust_er dispatch study.
//!
//! # Run loop
//!
//! ```text
//! draw:   for trial in 1..=num_trials: goal = rng.choose(goals)   (sequential)
//! search: for (trial, station): router.find_path(station, goal)  (parallel with `parallel`)
//!           NoRoute        → station ineligible this trial
//!           MeetingRoute   → recompute legs, total = max(fwd, bwd), score
//! reduce: per trial, lowest score wins; earlier station breaks ties
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the search phase on Rayon's thread pool.          |
//! | `serde`    | Deserialize `StationSpec` from run files.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use er_core::TrialConfig;
//! use er_spatial::{BidirectionalRouter, SearchParams};
//! use er_trial::{StationSpec, TrialSimBuilder};
//!
//! let config = TrialConfig::default();
//! let router = BidirectionalRouter::new(SearchParams::from(&config));
//! let sim = TrialSimBuilder::new(config, &network, router)
//!     .stations(vec![StationSpec::at_node("HQ", "7257925078")])
//!     .goals(goals)
//!     .build()?;
//! let outcome = sim.run()?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod result;
pub mod scorer;
pub mod simulator;
pub mod station;

#[cfg(test)]
mod tests;

pub use builder::TrialSimBuilder;
pub use error::{TrialError, TrialResult};
pub use observer::{NoopObserver, TrialObserver};
pub use result::{DispatchResult, TrialOutcome};
pub use scorer::{RiskScorer, RouteScorer, Score, TravelTimeScorer};
pub use simulator::TrialSimulator;
pub use station::{resolve_stations, Station, StationLocation, StationSpec};
