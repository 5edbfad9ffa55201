//! Error types for log file writing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while framing records into an output container.
#[derive(Error, Debug)]
pub enum SinkError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

/// A sink failure together with the number of entries already written.
#[derive(Error, Debug)]
#[error("failed after {entries} entries: {source}")]
pub struct WriteError {
    pub entries: u64,
    #[source]
    pub source: SinkError,
}

/// Errors from generating one complete log file.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The output file (or one of its container layers) could not be opened.
    #[error("failed to create file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: SinkError,
    },

    /// Writing or finalizing the file failed. The partial file is left on disk.
    #[error("failed to write log entry to {} after {entries} entries: {source}", path.display())]
    Write {
        path: PathBuf,
        entries: u64,
        #[source]
        source: SinkError,
    },
}

impl GenerateError {
    /// Entries written before the failure.
    pub fn entries(&self) -> u64 {
        match self {
            GenerateError::Create { .. } => 0,
            GenerateError::Write { entries, .. } => *entries,
        }
    }

    /// Path of the (possibly partial) output file.
    pub fn path(&self) -> &PathBuf {
        match self {
            GenerateError::Create { path, .. } | GenerateError::Write { path, .. } => path,
        }
    }
}

/// Unknown output format string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid format '{0}', use either 'json.gz' or 'csv.tar.gz'")]
pub struct FormatError(pub String);

/// Invalid size-accounting configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitsError {
    #[error("minimum file size must be greater than zero")]
    ZeroMinimum,

    #[error("minimum file size {min} exceeds maximum file size {max}")]
    InvertedRange { min: u64, max: u64 },

    #[error("approximate entry size must be greater than zero")]
    ZeroEntrySize,
}
