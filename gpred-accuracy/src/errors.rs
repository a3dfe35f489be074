use std::path::PathBuf;

use thiserror::Error;

use gpred_core::errors::{GenomeError, RegionSetError};
use gpred_io::PredictionsError;

fn describe_tried(primary: &PathBuf, fallback: &Option<PathBuf>) -> String {
    match fallback {
        Some(fallback) => format!("{} or {}", primary.display(), fallback.display()),
        None => format!("{} (no fallback directory given)", primary.display()),
    }
}

#[derive(Error, Debug)]
pub enum AccuracyError {
    #[error("Could not find {what}: tried {}", describe_tried(.primary, .fallback))]
    MissingSource {
        what: String,
        primary: PathBuf,
        fallback: Option<PathBuf>,
    },

    #[error("Region {name} of cluster {cluster} has no {cell_type} target signal")]
    MissingSignal {
        cluster: String,
        cell_type: String,
        name: String,
    },

    #[error("Region {0} has no name column")]
    UnnamedRegion(String),

    #[error("Column {column} is missing from {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid value {value} in {}", .path.display())]
    InvalidValue { path: PathBuf, value: String },

    #[error("Predictions for cluster {cluster} have {depth} channels but {cell_types} cell types were given")]
    DepthMismatch {
        cluster: String,
        depth: usize,
        cell_types: usize,
    },

    #[error("Length mismatch: got {0} values, expected {1}")]
    LengthMismatch(usize, usize),

    #[error("No cluster directories found in {}", .0.display())]
    NoClusters(PathBuf),

    #[error(transparent)]
    Predictions(#[from] PredictionsError),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    RegionSet(#[from] RegionSetError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AccuracyError>;
