//! `OutputObserver<W>` — bridges `TrialObserver` to an `OutputWriter`.

use er_spatial::RoadNetwork;
use er_trial::{DispatchResult, TrialObserver};

use crate::aggregate::{summarize, Summary};
use crate::row::ResultRow;
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`TrialObserver`] that streams result rows to any [`OutputWriter`]
/// backend and appends the `average` row when the run ends.
///
/// Errors from the writer are stored internally because `TrialObserver`
/// methods have no return value.  After `sim.run_with()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct OutputObserver<'a, W: OutputWriter> {
    writer:     W,
    network:    &'a RoadNetwork,
    best:       Vec<DispatchResult>,
    summary:    Option<Summary>,
    last_error: Option<OutputError>,
}

impl<'a, W: OutputWriter> OutputObserver<'a, W> {
    /// `network` renders node identifiers in the written rows.
    pub fn new(writer: W, network: &'a RoadNetwork) -> Self {
        Self {
            writer,
            network,
            best:       Vec::new(),
            summary:    None,
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Means over the best results, available once the run has ended.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Unwrap the inner writer (e.g. to append savings after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> TrialObserver for OutputObserver<'_, W> {
    fn on_station_result(&mut self, result: &DispatchResult) {
        let row = ResultRow::from_result(self.network, result);
        let r = self.writer.write_all(&[row]);
        self.store_err(r);
    }

    fn on_trial_end(&mut self, _trial: u32, best: Option<&DispatchResult>) {
        if let Some(best) = best {
            let row = ResultRow::from_result(self.network, best);
            let r = self.writer.write_best(&[row]);
            self.store_err(r);
            self.best.push(best.clone());
        }
    }

    fn on_run_end(&mut self, _completed: usize, _skipped: usize) {
        self.summary = summarize(&self.best);
        if let Some(summary) = &self.summary {
            summary.log();
            let r = self.writer.write_best(&[ResultRow::average(summary)]);
            self.store_err(r);
        }
    }
}
