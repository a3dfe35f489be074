use std::fmt::{self, Display};
use std::path::PathBuf;

use thiserror::Error;

use gpred_core::errors::{GenomeError, RegionSetError};
use gpred_io::PredictionsError;
use gpred_tracks::TrackError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WindowError {
    #[error("Site length {site_length} is not divisible by the model stride {stride}")]
    SiteNotDivisible { site_length: usize, stride: usize },

    #[error("Site of {site_bins} bins does not fit in a model output of {output_length} bins")]
    SiteTooLong {
        site_bins: usize,
        output_length: usize,
    },

    #[error("Sequence length {seq_length} is not divisible by the target length {target_length}")]
    InvalidStride {
        seq_length: usize,
        target_length: usize,
    },

    #[error("Cropping {crop} bins from each side leaves nothing of {target_length} bins")]
    CropTooLarge { target_length: usize, crop: usize },
}

/// One field on which two models disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: &'static str,
    pub model_a: usize,
    pub model_b: usize,
}

impl Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} vs {})", self.field, self.model_a, self.model_b)
    }
}

fn join_mismatches(mismatches: &[FieldMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("Models are incompatible: {}", join_mismatches(.0))]
    IncompatibleModels(Vec<FieldMismatch>),

    #[error(
        "Binary predictions do not cover the BED file: {missing} of {bed_rows} intervals have no score and {duplicated} have more than one (first: {example})"
    )]
    RoutingRowMismatch {
        bed_rows: usize,
        missing: usize,
        duplicated: usize,
        example: String,
    },

    #[error("Routing is not a partition of {total} sequences: {peaks} peak + {non_peaks} non-peak")]
    RoutingNotPartition {
        total: usize,
        peaks: usize,
        non_peaks: usize,
    },

    #[error("Could not read model parameters {}: {message}", .path.display())]
    Params { path: PathBuf, message: String },

    #[error("Could not read targets table {}: {message}", .path.display())]
    Targets { path: PathBuf, message: String },

    #[error("Model error: {0}")]
    Model(String),

    #[error("No inference backend for {}; build with the `onnx` feature", .0.display())]
    BackendUnavailable(PathBuf),

    #[error("Model returned {found} outputs for a batch of {expected}")]
    BatchSize { expected: usize, found: usize },

    #[error("Model output has shape {found:?}, expected {expected:?}")]
    OutputShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Target index {index} is out of range for a model with {depth} outputs")]
    TargetOutOfRange { index: usize, depth: usize },

    #[error("Prediction stream for {0} ended early")]
    StreamExhausted(&'static str),

    #[error("Prediction stream for {0} has unconsumed predictions")]
    StreamNotExhausted(&'static str),

    #[error("A genome FASTA (-f) is required to extract sequences")]
    MissingGenome,

    #[error("A chromosome sizes file (-g) is required to write tracks")]
    MissingChromSizes,

    #[error(transparent)]
    Predictions(#[from] PredictionsError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    RegionSet(#[from] RegionSetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PredictError>;
