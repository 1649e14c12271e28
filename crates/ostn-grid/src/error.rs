//! Error types for grid correction lookups.

use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while resolving or applying grid corrections.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The coordinate falls outside the extent of the correction grid.
    #[error("coordinate ({easting}, {northing}) is outside the correction grid: {reason}")]
    OutOfRange {
        easting: f64,
        northing: f64,
        reason: String,
    },

    /// The coordinate is inside the grid extent but a corner node has no record.
    #[error("no correction record for node {0}")]
    RecordNotFound(u32),

    /// A dataset line could not be parsed.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The dataset could not be opened or read.
    #[error("failed to read dataset: {0}")]
    Io(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The geodetic input could not be projected onto the National Grid.
    #[error("projection error: {0}")]
    Projection(String),
}

impl TransformError {
    /// Create an OutOfRange error.
    pub fn out_of_range(easting: f64, northing: f64, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            easting,
            northing,
            reason: reason.into(),
        }
    }

    /// Create a MalformedRecord error.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error is caused by the dataset itself rather than the input.
    pub fn is_dataset_fault(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. } | Self::Io(_))
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ProjectionError> for TransformError {
    fn from(err: ProjectionError) -> Self {
        Self::Projection(err.to_string())
    }
}

/// Result type for grid correction operations.
pub type Result<T> = std::result::Result<T, TransformError>;
