//! # Dual-model prediction of genomic intervals
//!
//! Sequences centered on each interval of a BED file are one-hot encoded and
//! predicted by one of two pretrained models. A binary classifier's score
//! decides which: intervals scoring at or above a threshold go to model A,
//! the rest to model B. Each model only sees its own sequences, and the
//! predictions are reassembled in BED order.
//!
//! From each prediction the bins covering a site centered in the sequence
//! are kept (optionally summed) and written to a Parquet results container;
//! selected channels can also be written as per-sequence signal tracks.
//!
//! The inference engine sits behind the [`SequenceModel`](model::SequenceModel)
//! trait. The `onnx` feature provides an implementation backed by `tract`.
pub mod consts;
pub mod dna;
pub mod driver;
pub mod ensemble;
pub mod errors;
pub mod model;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod params;
pub mod pipeline;
pub mod router;
pub mod stream;
pub mod window;

pub use driver::{ModelSpec, check_compatible, predict_routed};
pub use errors::{PredictError, Result, WindowError};
pub use model::SequenceModel;
pub use params::{ModelParams, PredictOptions};
pub use pipeline::{PredictInputs, PredictSummary, predict_bed, run_predict};
pub use router::{Route, RoutingAssignment, join_scores};
pub use window::{ModelOutput, SiteWindow};
