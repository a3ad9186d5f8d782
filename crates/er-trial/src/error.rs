use er_core::ErError;
use er_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrialError {
    #[error("trial configuration error: {0}")]
    Config(String),

    #[error("no candidate goals to draw incidents from")]
    NoGoals,

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

impl From<ErError> for TrialError {
    fn from(e: ErError) -> Self {
        match e {
            ErError::Config(msg) => TrialError::Config(msg),
            other => TrialError::Config(other.to_string()),
        }
    }
}

pub type TrialResult<T> = Result<T, TrialError>;
