//! Error types shared by the pipeline stages.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the live fetch. Every variant is recovered by falling back
/// to the synthetic dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    ConnectionFailure(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus(status.as_u16())
        } else if e.is_decode() {
            FetchError::MalformedPayload(e.to_string())
        } else {
            FetchError::ConnectionFailure(e.to_string())
        }
    }
}

/// Fatal errors that stop the pipeline at the stage where they occur.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceCause,
    },

    #[error("record {record_id} is missing field `{field}`")]
    MissingField { record_id: String, field: &'static str },

    #[error("no records to aggregate")]
    EmptyDataset,

    #[error("calendar anchor {anchor} leaves no room for the synthetic date window")]
    CalendarOutOfRange { anchor: NaiveDate },

    #[error("failed to render chart {name}: {reason}")]
    Chart { name: String, reason: String },
}

/// Underlying cause of a [`PipelineError::Persistence`].
#[derive(Error, Debug)]
pub enum PersistenceCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn persistence(path: impl Into<PathBuf>, source: impl Into<PersistenceCause>) -> Self {
        PipelineError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
