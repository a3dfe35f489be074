//! # Signal tracks for model predictions
//!
//! A model emits one value per output bin over its (cropped) input sequence.
//! This crate lays those values back onto the genome as contiguous,
//! fixed-width entries and writes them as a bigWig or bedGraph track.
//!
//! ```rust,ignore
//! use gpred_core::models::GenomicSpan;
//! use gpred_tracks::{TrackFormat, TrackWriter, track_entries};
//!
//! let span = GenomicSpan::new("chr1", 10_000, 11_000);
//! let entries = track_entries(&signal, &span, 100)?;
//!
//! let writer = TrackWriter::from_chrom_sizes("hg38.chrom.sizes", TrackFormat::BigWig)?;
//! writer.write("out/bigwig/s0_t3.bw", &span.chr, &entries)?;
//! ```
pub mod entries;
pub mod errors;
pub mod writing;

pub use entries::{TrackEntry, track_entries};
pub use errors::{Result, TrackError};
pub use writing::{TrackFormat, TrackWriter, track_file_name};
