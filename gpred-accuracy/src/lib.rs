//! Cluster level accuracy of predictions against experimental signal.
//!
//! For every cluster of predicted regions, predictions are joined to the
//! cluster's named regions and, per cell type, correlated with the summed
//! target signal of those regions on a `log2(x + 1)` scale. The result is a
//! clusters x cell types matrix of Pearson coefficients.
//!
//! # Example
//!
//! ```no_run
//! use gpred_accuracy::{AccuracyOptions, SourceDirs, evaluate, read_cell_types};
//!
//! let options = AccuracyOptions {
//!     predict_dir: "model/predict_beds".into(),
//!     sources: SourceDirs::new("targets", Some("more_targets"), false),
//!     cell_types: read_cell_types("targets.txt").unwrap(),
//! };
//!
//! let matrix = evaluate(&options).unwrap();
//! matrix.to_tsv("model/predict_beds/accuracy.tsv").unwrap();
//! ```
pub mod aggregate;
pub mod correlation;
pub mod errors;
pub mod matrix;
pub mod signal;
pub mod sources;

// re-exports
pub use aggregate::{
    AccuracyOptions, cluster_accuracy, default_predict_dir, discover_clusters, evaluate,
    match_regions, read_cell_types,
};
pub use correlation::{log_pearson, pearson};
pub use errors::{AccuracyError, Result};
pub use matrix::AccuracyMatrix;
pub use sources::SourceDirs;
