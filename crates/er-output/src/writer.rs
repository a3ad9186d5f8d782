//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, ResultRow, SavingRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Rows may arrive in several batches; each method appends.
pub trait OutputWriter {
    /// Append rows to the best-per-trial table.
    fn write_best(&mut self, rows: &[ResultRow]) -> OutputResult<()>;

    /// Append rows to the every-station table.
    fn write_all(&mut self, rows: &[ResultRow]) -> OutputResult<()>;

    fn write_savings(&mut self, rows: &[SavingRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
