//! `er-output` — aggregation and writers for dispatch trial results.
//!
//! Two table backends are provided, the second behind a Cargo feature:
//!
//! | Feature   | Backend     | Files created                          |
//! |-----------|-------------|----------------------------------------|
//! | *(none)*  | CSV         | `best.csv`, `all.csv`, `savings.csv`   |
//! | `sqlite`  | SQLite      | `output.db`                            |
//!
//! Both implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `er_trial::TrialObserver`.  Path polylines go to a
//! separate JSON file via [`export_paths_json`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use er_output::{CsvWriter, OutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = OutputObserver::new(writer, &network);
//! let outcome = sim.run_with(&mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! let mut writer = obs.into_writer();
//! writer.finish()?;
//! ```

pub mod aggregate;
pub mod csv;
pub mod error;
pub mod observer;
pub mod paths;
pub mod row;
pub mod savings;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use aggregate::{summarize, Summary};
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use paths::{export_paths_json, write_paths_json, PathExport};
pub use row::{render_path, round2, ResultRow, SavingRow, AVERAGE_LABEL, PATH_SEPARATOR};
pub use savings::saving_analysis;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
