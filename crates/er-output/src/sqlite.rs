//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `best_results`, `all_results`, and `savings`.  Values are
//! stored unrounded; missing values are `NULL`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, ResultRow, SavingRow};

const RESULT_COLUMNS: &str = "
    trial          TEXT NOT NULL,
    station        TEXT,
    station_node   TEXT,
    goal           TEXT,
    meeting        TEXT,
    u_x            REAL,
    u_y            REAL,
    v_x            REAL,
    v_y            REAL,
    forward_time   REAL NOT NULL,
    backward_time  REAL NOT NULL,
    total_cost     REAL NOT NULL,
    total_risk     REAL,
    score          REAL NOT NULL,
    total_time_min REAL NOT NULL,
    path_length    REAL NOT NULL,
    path           TEXT,
    forward_path   TEXT,
    backward_path  TEXT";

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS best_results ({RESULT_COLUMNS});
             CREATE TABLE IF NOT EXISTS all_results ({RESULT_COLUMNS});
             CREATE TABLE IF NOT EXISTS savings (
                 trial                    INTEGER NOT NULL,
                 station                  TEXT NOT NULL,
                 goal                     TEXT NOT NULL,
                 total_time_min           REAL NOT NULL,
                 duration                 REAL NOT NULL,
                 duration_bus             REAL NOT NULL,
                 duration_ambulance       REAL NOT NULL,
                 bus_diff                 REAL NOT NULL,
                 ambulance_diff           REAL NOT NULL,
                 bus_saving_percent       REAL,
                 ambulance_saving_percent REAL
             );"
        ))?;

        Ok(Self { conn, finished: false })
    }

    fn insert_results(&mut self, table: &str, rows: &[ResultRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {table} \
                 (trial, station, station_node, goal, meeting, u_x, u_y, v_x, v_y, \
                  forward_time, backward_time, total_cost, total_risk, score, \
                  total_time_min, path_length, path, forward_path, backward_path) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
                         ?15, ?16, ?17, ?18, ?19)"
            ))?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.trial,
                    row.station,
                    row.station_node,
                    row.goal,
                    row.meeting,
                    row.origin.map(|p| p[0]),
                    row.origin.map(|p| p[1]),
                    row.destination.map(|p| p[0]),
                    row.destination.map(|p| p[1]),
                    row.forward_time,
                    row.backward_time,
                    row.total_cost,
                    row.total_risk,
                    row.score,
                    row.total_time_min,
                    row.path_length,
                    row.path,
                    row.forward_path,
                    row.backward_path,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_best(&mut self, rows: &[ResultRow]) -> OutputResult<()> {
        self.insert_results("best_results", rows)
    }

    fn write_all(&mut self, rows: &[ResultRow]) -> OutputResult<()> {
        self.insert_results("all_results", rows)
    }

    fn write_savings(&mut self, rows: &[SavingRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO savings \
                 (trial, station, goal, total_time_min, duration, duration_bus, \
                  duration_ambulance, bus_diff, ambulance_diff, bus_saving_percent, \
                  ambulance_saving_percent) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.trial,
                    row.station,
                    row.goal,
                    row.total_time_min,
                    row.duration,
                    row.duration_bus,
                    row.duration_ambulance,
                    row.bus_diff,
                    row.ambulance_diff,
                    row.bus_saving_percent,
                    row.ambulance_saving_percent,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
