//! Trial observer trait for progress reporting.

use er_core::NodeId;

use crate::DispatchResult;

/// Callbacks invoked by [`TrialSimulator::run_with`][crate::TrialSimulator::run_with]
/// while results are reduced, in trial order.
///
/// All methods have default no-op implementations.
///
/// # Example
///
/// ```rust,ignore
/// struct Progress;
///
/// impl TrialObserver for Progress {
///     fn on_trial_end(&mut self, trial: u32, best: Option<&DispatchResult>) {
///         if let Some(b) = best {
///             println!("trial {trial}: {} in {:.1} min", b.station, b.total_time_min);
///         }
///     }
/// }
/// ```
pub trait TrialObserver {
    /// Called once per trial with the drawn incident node.
    fn on_trial_start(&mut self, _trial: u32, _goal: NodeId) {}

    /// Called for every station that reached the incident.
    fn on_station_result(&mut self, _result: &DispatchResult) {}

    /// Called after the best station is chosen; `None` when the trial was
    /// skipped.
    fn on_trial_end(&mut self, _trial: u32, _best: Option<&DispatchResult>) {}

    /// Called once after the last trial.
    fn on_run_end(&mut self, _completed: usize, _skipped: usize) {}
}

/// A [`TrialObserver`] that does nothing.
pub struct NoopObserver;

impl TrialObserver for NoopObserver {}
