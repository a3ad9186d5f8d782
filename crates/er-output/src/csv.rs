//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `best.csv` (one row per trial, then the `average` row)
//! - `all.csv`
//! - `savings.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::{RESULT_HEADER, SAVING_HEADER};
use crate::writer::OutputWriter;
use crate::{OutputResult, ResultRow, SavingRow};

/// Writes run output to three CSV files.
pub struct CsvWriter {
    best:     Writer<File>,
    all:      Writer<File>,
    savings:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut best = Writer::from_path(dir.join("best.csv"))?;
        best.write_record(RESULT_HEADER)?;

        let mut all = Writer::from_path(dir.join("all.csv"))?;
        all.write_record(RESULT_HEADER)?;

        let mut savings = Writer::from_path(dir.join("savings.csv"))?;
        savings.write_record(SAVING_HEADER)?;

        Ok(Self { best, all, savings, finished: false })
    }
}

fn write_rows(w: &mut Writer<File>, rows: &[ResultRow]) -> OutputResult<()> {
    for row in rows {
        w.write_record(row.to_record())?;
    }
    Ok(())
}

impl OutputWriter for CsvWriter {
    fn write_best(&mut self, rows: &[ResultRow]) -> OutputResult<()> {
        write_rows(&mut self.best, rows)
    }

    fn write_all(&mut self, rows: &[ResultRow]) -> OutputResult<()> {
        write_rows(&mut self.all, rows)
    }

    fn write_savings(&mut self, rows: &[SavingRow]) -> OutputResult<()> {
        for row in rows {
            self.savings.write_record(row.to_record())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.best.flush()?;
        self.all.flush()?;
        self.savings.flush()?;
        Ok(())
    }
}
