use std::io;
use thiserror::Error;

/// Error type for gpred-io operations.
#[derive(Error, Debug)]
pub enum PredictionsError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A row did not carry `site_bins x depth` values.
    #[error("Prediction row has {found} values, expected {expected}")]
    WidthMismatch { expected: usize, found: usize },

    /// Rows must be written in sequence order.
    #[error("Prediction row {found} written out of order, expected row {expected}")]
    OutOfOrder { expected: usize, found: usize },

    #[error("Prediction file is missing column `{0}`")]
    MissingColumn(String),

    #[error("Column `{column}` has unexpected type {found}")]
    UnexpectedType { column: String, found: String },

    #[error("Prediction file is missing schema metadata `{0}`")]
    MissingMetadata(String),

    #[error("Invalid schema metadata `{key}`: {value}")]
    InvalidMetadata { key: String, value: String },

    /// Rows hold more than one value per channel, so they can't be read as
    /// a `sequences x channels` matrix.
    #[error("Predictions of shape {site_bins} bins x {depth} channels can't be squeezed to one value per channel")]
    NotSqueezable { site_bins: usize, depth: usize },
}

/// Result type alias for gpred-io operations.
pub type Result<T> = std::result::Result<T, PredictionsError>;
