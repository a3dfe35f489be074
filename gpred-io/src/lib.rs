//! # Input/Output utilities for prediction tables.
//!
//! Predictions are persisted as a Parquet file with one row per sequence,
//! in the order the sequences were read from the input BED file. Each row
//! carries the site coordinates and a fixed-width list of half precision
//! values (`site_bins x depth`, or `depth` when summed over the site).
//!
//! The same container is read back to route sequences by a binary
//! classifier's scores and to evaluate predictions against target signal.
//!
pub mod consts;
pub mod error;
pub mod predictions;

// re-expose core functions
pub use consts::*;
pub use error::*;
pub use predictions::*;
