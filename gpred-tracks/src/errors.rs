use thiserror::Error;

use gpred_core::errors::GenomeError;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error(
        "Cropped sequence of {cropped} bases does not split evenly into {bins} bins (span {span}, crop {crop})"
    )]
    UnevenBins {
        span: String,
        crop: i64,
        cropped: i64,
        bins: usize,
    },

    #[error("Nothing left of span {span} after cropping {crop} bases from each side")]
    CroppedAway { span: String, crop: i64 },

    #[error("Chromosome {0} is missing from the chromosome sizes reference")]
    UnknownChromosome(String),

    #[error("Unknown track format: {0} (expected bigwig or bedgraph)")]
    UnknownFormat(String),

    #[error("Failed to write bigWig {path}: {message}")]
    BigWig { path: String, message: String },

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
