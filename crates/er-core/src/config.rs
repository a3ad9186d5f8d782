//! Run configuration for a batch of dispatch trials.

use crate::{ErError, ErResult};

/// How the best station of a trial is chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScoringMode {
    /// Minimise the combined travel cost.
    #[default]
    TravelTime,
    /// Minimise `alpha * cost + (1 - alpha) * risk`.
    RiskWeighted,
}

/// Parameters shared by every trial of a run.
///
/// `Default` carries the calibrated values used for the Mapo/Seodaemun study
/// area: 50 trials, seed 42, a 60 s meeting window, and a 0.692 forward speed
/// multiplier for emergency vehicles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrialConfig {
    /// Number of simulated incidents.
    pub num_trials: u32,

    /// Seed for the goal-draw RNG.
    pub seed: u64,

    /// Maximum allowed gap (seconds) between the forward and backward
    /// arrival estimates at a meeting node.
    pub max_time_diff: f64,

    /// Multiplier applied to every forward-search edge weight.
    pub weight_factor: f64,

    /// Travel-cost share of the combined score in risk mode, in `[0, 1]`.
    pub alpha: f64,

    pub mode: ScoringMode,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            num_trials:    50,
            seed:          42,
            max_time_diff: 60.0,
            weight_factor: 0.692,
            alpha:         0.7,
            mode:          ScoringMode::TravelTime,
        }
    }
}

impl TrialConfig {
    /// Reject parameter combinations the search cannot run with.
    pub fn validate(&self) -> ErResult<()> {
        if !(self.weight_factor.is_finite() && self.weight_factor > 0.0) {
            return Err(ErError::Config(format!(
                "weight_factor must be finite and > 0, got {}",
                self.weight_factor
            )));
        }
        if self.max_time_diff.is_nan() || self.max_time_diff < 0.0 {
            return Err(ErError::Config(format!(
                "max_time_diff must be >= 0, got {}",
                self.max_time_diff
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ErError::Config(format!(
                "alpha must lie in [0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
