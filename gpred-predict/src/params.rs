use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use gpred_tracks::TrackFormat;

use crate::consts::{DEFAULT_OUT_DIR, DEFAULT_THRESHOLD};
use crate::errors::{PredictError, Result, WindowError};
use crate::window::ModelOutput;

///
/// Model parameters as stored next to a trained model.
///
/// ```json
/// { "model": { "seq_length": 131072, "target_length": 1024, "target_crop": 64 },
///   "train": { "batch_size": 4 } }
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelParams {
    pub model: ArchitectureParams,
    pub train: TrainParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchitectureParams {
    pub seq_length: usize,
    /// Output bins before cropping.
    pub target_length: usize,
    #[serde(default)]
    pub target_crop: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainParams {
    pub batch_size: usize,
}

impl ModelParams {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let params_error = |message: String| PredictError::Params {
            path: path.to_path_buf(),
            message,
        };

        let file = File::open(path).map_err(|e| params_error(e.to_string()))?;
        let params: ModelParams = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| params_error(e.to_string()))?;

        if params.train.batch_size == 0 {
            return Err(params_error("batch_size must be positive".to_string()));
        }

        Ok(params)
    }

    /// Input bases per output bin.
    pub fn window_stride(&self) -> std::result::Result<usize, WindowError> {
        let model = &self.model;
        if model.target_length == 0 || model.seq_length % model.target_length != 0 {
            return Err(WindowError::InvalidStride {
                seq_length: model.seq_length,
                target_length: model.target_length,
            });
        }
        Ok(model.seq_length / model.target_length)
    }

    ///
    /// Describe the model output for a given number of channels.
    ///
    pub fn output(&self, depth: usize) -> std::result::Result<ModelOutput, WindowError> {
        let model = &self.model;
        let window_stride = self.window_stride()?;
        if 2 * model.target_crop >= model.target_length {
            return Err(WindowError::CropTooLarge {
                target_length: model.target_length,
                crop: model.target_crop,
            });
        }

        Ok(ModelOutput {
            window_stride,
            output_length: model.target_length - 2 * model.target_crop,
            depth,
            edge_crop: model.target_crop,
        })
    }
}

///
/// Options of a prediction run.
///
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Model output used for predictions.
    pub head: usize,
    /// Target indices to write tracks for.
    pub track_indexes: Vec<usize>,
    /// Use this model output as an embedding instead of the head.
    pub embed_layer: Option<usize>,
    pub genome_fasta: Option<PathBuf>,
    pub chrom_sizes: Option<PathBuf>,
    pub site_length: Option<usize>,
    pub out_dir: PathBuf,
    pub processes: usize,
    pub rc: bool,
    pub shifts: Vec<i64>,
    pub sum: bool,
    pub targets_file: Option<PathBuf>,
    pub threshold: f32,
    pub track_format: TrackFormat,
}

impl Default for PredictOptions {
    fn default() -> Self {
        PredictOptions {
            head: 0,
            track_indexes: Vec::new(),
            embed_layer: None,
            genome_fasta: None,
            chrom_sizes: None,
            site_length: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            processes: 1,
            rc: false,
            shifts: vec![0],
            sum: false,
            targets_file: None,
            threshold: DEFAULT_THRESHOLD,
            track_format: TrackFormat::BigWig,
        }
    }
}

impl PredictOptions {
    /// Model output the backend should read.
    pub fn output_index(&self) -> usize {
        self.embed_layer.unwrap_or(self.head)
    }
}
