use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use ndarray::Axis;

use gpred_core::genome::Genome;
use gpred_core::models::{GenomicSpan, RegionSet};
use gpred_core::utils::DelimitedTable;
use gpred_io::{PREDICTIONS_FILE_NAME, PredictionShape, PredictionTable, PredictionWriter};
use gpred_tracks::{TrackWriter, track_entries, track_file_name};

use crate::consts::TRACK_DIR;
use crate::dna::one_hot;
use crate::driver::{ModelSpec, check_compatible, predict_routed};
use crate::ensemble::{EnsembleModel, SlicedModel};
use crate::errors::{PredictError, Result};
use crate::model::SequenceModel;
use crate::params::{ModelParams, PredictOptions};
use crate::router::{RoutingAssignment, join_scores};
use crate::window::SiteWindow;

/// Files a prediction run reads.
#[derive(Debug, Clone)]
pub struct PredictInputs {
    pub params_a: PathBuf,
    pub model_a: PathBuf,
    pub params_b: PathBuf,
    pub model_b: PathBuf,
    pub binary_preds: PathBuf,
    pub bed_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub peaks: usize,
    pub non_peaks: usize,
    pub tracks: usize,
}

///
/// Target indices from a targets table: tab-separated with a header, the
/// first column holding the index of each target in the model output.
///
pub fn read_targets<P: AsRef<Path>>(path: P) -> Result<Vec<usize>> {
    let path = path.as_ref();
    let table = DelimitedTable::from_path(path, None)?;

    table
        .index()
        .into_iter()
        .map(|index| {
            index.parse::<usize>().map_err(|_| PredictError::Targets {
                path: path.to_path_buf(),
                message: format!("target index {} is not a non-negative integer", index),
            })
        })
        .collect()
}

///
/// Wrap a loaded model with target slicing and ensembling as requested.
///
pub fn prepare_model<M: SequenceModel + 'static>(
    model: M,
    targets: Option<&[usize]>,
    options: &PredictOptions,
) -> Result<Box<dyn SequenceModel>> {
    let ensemble = |model: Box<dyn SequenceModel>| -> Box<dyn SequenceModel> {
        Box::new(EnsembleModel::new(model, options.rc, options.shifts.clone()))
    };

    // embeddings are not sliced to targets
    match (targets, options.embed_layer) {
        (Some(targets), None) => {
            let sliced = SlicedModel::new(model, targets.to_vec())?;
            Ok(ensemble(Box::new(sliced)))
        }
        _ => Ok(ensemble(Box::new(model))),
    }
}

///
/// Predict every interval of a BED file with one of two models, routed by a
/// binary classifier's scores, and write the results container plus any
/// requested tracks under `options.out_dir`.
///
/// Intervals scoring at or above `options.threshold` go to `model_a`.
///
pub fn predict_bed<A, B>(
    model_a: A,
    model_b: B,
    binary_preds: &Path,
    bed_file: &Path,
    options: &PredictOptions,
) -> Result<PredictSummary>
where
    A: SequenceModel + 'static,
    B: SequenceModel + 'static,
{
    log::info!("Running with {} process(es)", options.processes);

    let targets = match &options.targets_file {
        Some(path) => Some(read_targets(path)?),
        None => None,
    };
    let mut model_a = prepare_model(model_a, targets.as_deref(), options)?;
    let mut model_b = prepare_model(model_b, targets.as_deref(), options)?;

    let spec = ModelSpec::of(&model_a);
    check_compatible(&spec, &ModelSpec::of(&model_b))?;
    let output = spec.output;

    let window = SiteWindow::new(&output, options.site_length)?;
    window.log_warnings();
    log::info!(
        "Site length {} bp ({} bins, {}..{})",
        window.site_length,
        window.site_bins,
        window.start_bin,
        window.end_bin
    );

    if let Some(index) = options.track_indexes.iter().find(|t| **t >= output.depth) {
        return Err(PredictError::TargetOutOfRange {
            index: *index,
            depth: output.depth,
        });
    }
    let track_writer = match (options.track_indexes.is_empty(), &options.chrom_sizes) {
        (true, _) => None,
        (false, Some(chrom_sizes)) => Some(TrackWriter::from_chrom_sizes(
            chrom_sizes,
            options.track_format,
        )?),
        (false, None) => return Err(PredictError::MissingChromSizes),
    };

    // inputs
    let regions = RegionSet::try_from(bed_file)?;
    let genome_fasta = options
        .genome_fasta
        .as_ref()
        .ok_or(PredictError::MissingGenome)?;
    let genome = Genome::from_fasta(genome_fasta, Some(&regions.chroms()))?;

    let seq_coords: Vec<GenomicSpan> = regions
        .regions
        .iter()
        .map(|r| r.centered(spec.seq_length as u64))
        .collect();
    let site_coords: Vec<GenomicSpan> = regions
        .regions
        .iter()
        .map(|r| r.centered(window.site_length as u64))
        .collect();

    // routing
    let binary = PredictionTable::from_path(binary_preds)?;
    log::info!(
        "Binary predictions: {} rows; BED: {} intervals",
        binary.len(),
        regions.len()
    );
    let scores = join_scores(&regions, &binary)?;
    let assignment = RoutingAssignment::from_scores(&scores, options.threshold)?;
    log::info!(
        "{} intervals at or above {} go to model A, {} to model B",
        assignment.peaks().len(),
        options.threshold,
        assignment.non_peaks().len()
    );

    // outputs
    create_dir_all(&options.out_dir)?;
    let track_dir = options.out_dir.join(TRACK_DIR);
    if track_writer.is_some() {
        create_dir_all(&track_dir)?;
    }

    let shape = PredictionShape {
        site_bins: window.site_bins,
        depth: output.depth,
        summed: options.sum,
    };
    let mut writer = PredictionWriter::create(options.out_dir.join(PREDICTIONS_FILE_NAME), shape)?;
    let seq_crop = output.seq_crop() as i64;
    let mut tracks = 0;

    let encode = |index: usize| -> Result<_> {
        let seq = genome.fetch_padded(&seq_coords[index])?;
        Ok(one_hot(&seq))
    };

    predict_routed(
        &mut model_a,
        &mut model_b,
        &assignment,
        encode,
        |index, preds| {
            let site = window.slice(preds.view());
            let values: Vec<f32> = match options.sum {
                true => site.sum_axis(Axis(0)).to_vec(),
                false => site.iter().copied().collect(),
            };
            writer.write_row(index, &site_coords[index], &values)?;

            if let Some(track_writer) = &track_writer {
                let span = &seq_coords[index];
                for target in &options.track_indexes {
                    let signal = preds.column(*target).to_vec();
                    let entries = track_entries(&signal, span, seq_crop)?;
                    let path = track_dir.join(track_file_name(index, *target, track_writer.format()));
                    if track_writer.write(path, &span.chr, &entries)? > 0 {
                        tracks += 1;
                    }
                }
            }

            Ok(())
        },
    )?;

    let rows = writer.len();
    let output_path = writer.finish()?;

    Ok(PredictSummary {
        output: output_path,
        rows,
        peaks: assignment.peaks().len(),
        non_peaks: assignment.non_peaks().len(),
        tracks,
    })
}

///
/// Load a model with the configured inference backend.
///
#[cfg(feature = "onnx")]
pub fn load_model(
    params_path: &Path,
    model_path: &Path,
    options: &PredictOptions,
) -> Result<Box<dyn SequenceModel>> {
    let params = ModelParams::from_path(params_path)?;
    let model = crate::onnx::OnnxModel::load(model_path, &params, options.output_index())?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
pub fn load_model(
    params_path: &Path,
    model_path: &Path,
    _options: &PredictOptions,
) -> Result<Box<dyn SequenceModel>> {
    // validate the parameters anyway so configuration errors surface first
    ModelParams::from_path(params_path)?;
    Err(PredictError::BackendUnavailable(model_path.to_path_buf()))
}

///
/// Load both models and run [`predict_bed`].
///
pub fn run_predict(inputs: &PredictInputs, options: &PredictOptions) -> Result<PredictSummary> {
    let model_a = load_model(&inputs.params_a, &inputs.model_a, options)?;
    let model_b = load_model(&inputs.params_b, &inputs.model_b, options)?;

    predict_bed(
        model_a,
        model_b,
        &inputs.binary_preds,
        &inputs.bed_file,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    #[rstest]
    fn test_read_targets() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"index\tidentifier\tdescription\n4\tCT1\tx\n0\tCT2\ty\n")
            .unwrap();

        assert_eq!(read_targets(file.path()).unwrap(), vec![4, 0]);
    }

    #[rstest]
    fn test_read_targets_bad_index() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"index\tidentifier\nfirst\tCT1\n").unwrap();

        assert!(matches!(
            read_targets(file.path()),
            Err(PredictError::Targets { .. })
        ));
    }
}
