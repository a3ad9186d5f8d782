//! Station scoring strategies.
//!
//! The search is the same in every mode; only the number used to rank
//! stations within a trial changes.  Lower is better.

use er_core::NodeId;
use er_spatial::RiskIndex;

/// What a scorer reports for one station route.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Score {
    pub value:      f64,
    /// Path risk, when the scorer looks at risk at all.
    pub total_risk: Option<f64>,
}

/// Ranks one station's route to the incident.
///
/// `Send + Sync` because one scorer is shared by every worker when the
/// `parallel` feature is on.
pub trait RouteScorer: Send + Sync {
    fn score(&self, total_cost: f64, forward_path: &[NodeId]) -> Score;
}

/// Rank by combined travel cost alone.
#[derive(Copy, Clone, Debug, Default)]
pub struct TravelTimeScorer;

impl RouteScorer for TravelTimeScorer {
    fn score(&self, total_cost: f64, _forward_path: &[NodeId]) -> Score {
        Score { value: total_cost, total_risk: None }
    }
}

/// Rank by `alpha * cost + (1 - alpha) * risk`.
///
/// Risk is summed over the forward (station → meeting node) leg only.
#[derive(Copy, Clone, Debug)]
pub struct RiskScorer<'a> {
    pub alpha: f64,
    pub index: &'a RiskIndex,
}

impl<'a> RiskScorer<'a> {
    pub fn new(alpha: f64, index: &'a RiskIndex) -> Self {
        Self { alpha, index }
    }
}

impl RouteScorer for RiskScorer<'_> {
    fn score(&self, total_cost: f64, forward_path: &[NodeId]) -> Score {
        let risk = self.index.total_risk(forward_path);
        Score {
            value:      self.alpha * total_cost + (1.0 - self.alpha) * risk,
            total_risk: Some(risk),
        }
    }
}
