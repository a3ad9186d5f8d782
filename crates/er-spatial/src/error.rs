//! Spatial-subsystem error type.

use thiserror::Error;

use er_core::NodeId;

/// Errors produced by `er-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The two searches never met.  Callers treat this as "station
    /// ineligible", not as a failure of the run.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("unknown node identifier {0:?}")]
    UnknownNode(String),

    /// A tabular edge record is missing a required field or carries an
    /// unusable value.  `row` is the 1-based data row (header excluded).
    #[error("malformed edge record at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
