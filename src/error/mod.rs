//! Error handling for the claims metrics pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

/// Errors raised while loading, aggregating or reporting claim data
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input path is missing or is not a directory
    #[error("Invalid input path '{}': {reason}", path.display())]
    InvalidInputPath { path: PathBuf, reason: String },

    /// Error opening, reading or writing a file
    #[error("IO error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File content is not valid JSON or does not match the expected shape
    #[error("JSON error in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Pharmacy file content is not valid CSV
    #[error("CSV error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File parsed but its structure is unusable
    #[error("Malformed record in '{}': {message}", path.display())]
    MalformedRecord { path: PathBuf, message: String },

    /// Rejected rows could not be persisted; valid rows are unaffected
    #[error("Quarantine write failed for '{}': {source}", path.display())]
    QuarantineWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A worker failed while processing one claims file
    #[error("Worker failed on '{}': {source}", path.display())]
    Worker {
        path: PathBuf,
        #[source]
        source: Box<PipelineError>,
    },

    /// The worker pool needs at least one worker
    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    /// The worker pool could not be started
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    /// Wrap an IO error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON error with the file it happened in
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Wrap a CSV error with the file it happened in
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Structural problem with a file's content
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach the claims file a worker was processing
    #[must_use]
    pub fn in_worker(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ Self::Worker { .. } => already,
            other => Self::Worker {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
