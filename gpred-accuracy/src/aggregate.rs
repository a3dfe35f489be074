use std::collections::HashMap;
use std::fs::read_dir;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use gpred_core::models::RegionSet;
use gpred_core::utils::DelimitedTable;
use gpred_io::{PREDICTIONS_FILE_NAME, PredictionTable};

use crate::correlation::log_pearson;
use crate::errors::{AccuracyError, Result};
use crate::matrix::AccuracyMatrix;
use crate::signal::TargetSignal;
use crate::sources::SourceDirs;

pub const PREDICT_DIR_NAME: &str = "predict_beds";
pub const IDENTIFIER_COLUMN: &str = "identifier";

#[derive(Debug, Clone)]
pub struct AccuracyOptions {
    /// Directory with one sub-directory of predictions per cluster.
    pub predict_dir: PathBuf,
    pub sources: SourceDirs,
    /// Cell types, in the order of the prediction channels.
    pub cell_types: Vec<String>,
}

///
/// Cell types listed in the `identifier` column of a targets table.
///
pub fn read_cell_types<P: AsRef<Path>>(targets_file: P) -> Result<Vec<String>> {
    let path = targets_file.as_ref();
    let table = DelimitedTable::from_path(path, None)?;
    let identifiers = table
        .column(IDENTIFIER_COLUMN)
        .ok_or_else(|| AccuracyError::MissingColumn {
            path: path.to_path_buf(),
            column: IDENTIFIER_COLUMN.to_string(),
        })?;

    Ok(identifiers.into_iter().map(|s| s.to_string()).collect())
}

///
/// Predictions directory for an output file: `<prefix>/predict_beds`, where
/// `prefix` is the part of the output path before `/predict_beds`, or the
/// output file's directory.
///
pub fn default_predict_dir(output_file: &Path) -> PathBuf {
    let output = output_file.to_string_lossy();
    let marker = format!("/{}", PREDICT_DIR_NAME);

    let prefix = match output.find(&marker) {
        Some(position) => PathBuf::from(&output[..position]),
        None => output_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };
    prefix.join(PREDICT_DIR_NAME)
}

///
/// Cluster names: the sub-directories of the predictions directory, sorted.
///
pub fn discover_clusters<P: AsRef<Path>>(predict_dir: P) -> Result<Vec<String>> {
    let predict_dir = predict_dir.as_ref();
    let mut clusters = Vec::new();
    for entry in read_dir(predict_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            clusters.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    if clusters.is_empty() {
        return Err(AccuracyError::NoClusters(predict_dir.to_path_buf()));
    }
    clusters.sort();

    Ok(clusters)
}

///
/// Predictions joined to named regions.
///
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRegions {
    pub names: Vec<String>,
    /// One column of predictions per channel, aligned with `names`.
    pub preds: Vec<Vec<f64>>,
}

///
/// Inner join of prediction rows with regions on exact `(chrom, start, end)`.
///
/// Rows come out in prediction order; predictions without a region are
/// dropped. NaN predictions become 0.
///
pub fn match_regions(table: &PredictionTable, regions: &RegionSet) -> Result<MatchedRegions> {
    let depth = table.squeezed_depth()?;

    let mut by_key: HashMap<(String, i64, i64), Vec<&str>> = HashMap::new();
    for region in regions {
        let name = region
            .name()
            .ok_or_else(|| AccuracyError::UnnamedRegion(region.to_string()))?;
        by_key.entry(region.key()).or_default().push(name);
    }

    let mut matched = MatchedRegions {
        names: Vec::new(),
        preds: vec![Vec::new(); depth],
    };
    for row in 0..table.len() {
        let Some(names) = by_key.get(&table.span(row).key()) else {
            continue;
        };
        for name in names {
            matched.names.push(name.to_string());
            for (column, value) in matched.preds.iter_mut().zip(table.row(row)) {
                column.push(if value.is_nan() { 0.0 } else { *value as f64 });
            }
        }
    }

    Ok(matched)
}

///
/// Correlation of predictions with target signal for every cell type of one
/// cluster.
///
pub fn cluster_accuracy(cluster: &str, options: &AccuracyOptions) -> Result<Vec<f64>> {
    let table =
        PredictionTable::from_path(options.predict_dir.join(cluster).join(PREDICTIONS_FILE_NAME))?;
    let depth = table.squeezed_depth()?;
    if depth != options.cell_types.len() {
        return Err(AccuracyError::DepthMismatch {
            cluster: cluster.to_string(),
            depth,
            cell_types: options.cell_types.len(),
        });
    }

    let regions = RegionSet::try_from(options.sources.region_file(cluster)?)?;
    let matched = match_regions(&table, &regions)?;
    log::info!(
        "Cluster {}: {} of {} predictions matched to regions",
        cluster,
        matched.names.len(),
        table.len()
    );

    let mut row = Vec::with_capacity(options.cell_types.len());
    for (cell_type, preds) in options.cell_types.iter().zip(&matched.preds) {
        let signal = TargetSignal::from_path(options.sources.signal_file(cluster, cell_type)?)?;
        let targets = matched
            .names
            .iter()
            .map(|name| {
                signal
                    .get(name)
                    .ok_or_else(|| AccuracyError::MissingSignal {
                        cluster: cluster.to_string(),
                        cell_type: cell_type.to_string(),
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        let r = log_pearson(&targets, preds)?;
        log::debug!("{} / {}: r = {}", cluster, cell_type, r);
        row.push(r);
    }

    Ok(row)
}

///
/// Build the clusters x cell types accuracy matrix.
///
pub fn evaluate(options: &AccuracyOptions) -> Result<AccuracyMatrix> {
    let clusters = discover_clusters(&options.predict_dir)?;
    log::info!(
        "Evaluating {} clusters against {} cell types",
        clusters.len(),
        options.cell_types.len()
    );

    let mut matrix = AccuracyMatrix::new(options.cell_types.clone());
    let bar = ProgressBar::new(clusters.len() as u64);
    for cluster in &clusters {
        let row = cluster_accuracy(cluster, options)?;
        matrix.push_row(cluster.as_str(), &row)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    use gpred_core::models::{GenomicSpan, Region};
    use gpred_io::{PredictionShape, PredictionWriter};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("/data/model/predict_beds/accuracy.tsv", "/data/model/predict_beds")]
    #[case("out/predict_beds_summary.tsv", "out/predict_beds")]
    #[case("results/accuracy.tsv", "results/predict_beds")]
    fn test_default_predict_dir(#[case] output: &str, #[case] expected: &str) {
        assert_eq!(
            default_predict_dir(Path::new(output)),
            PathBuf::from(expected)
        );
    }

    #[rstest]
    fn test_discover_clusters_sorted() {
        let tempdir = tempfile::tempdir().unwrap();
        for name in ["c2", "c10", "c1"] {
            std::fs::create_dir_all(tempdir.path().join(name)).unwrap();
        }
        std::fs::write(tempdir.path().join("notes.txt"), b"").unwrap();

        assert_eq!(
            discover_clusters(tempdir.path()).unwrap(),
            vec!["c1", "c10", "c2"]
        );
    }

    #[rstest]
    fn test_inner_join_drops_unmatched() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(PREDICTIONS_FILE_NAME);
        let shape = PredictionShape {
            site_bins: 1,
            depth: 2,
            summed: false,
        };
        let mut writer = PredictionWriter::create(&path, shape).unwrap();
        writer
            .write_row(0, &GenomicSpan::new("chr1", 0, 10), &[1.0, 2.0])
            .unwrap();
        writer
            .write_row(1, &GenomicSpan::new("chr1", 20, 30), &[3.0, f32::NAN])
            .unwrap();
        writer
            .write_row(2, &GenomicSpan::new("chr2", 0, 10), &[5.0, 6.0])
            .unwrap();
        writer.finish().unwrap();
        let table = PredictionTable::from_path(&path).unwrap();

        let region = |chr: &str, start: u32, end: u32, name: &str| Region {
            chr: chr.to_string(),
            start,
            end,
            rest: Some(name.to_string()),
        };
        let regions = RegionSet::from(vec![
            region("chr2", 0, 10, "b"),
            region("chr1", 20, 30, "a"),
            region("chr3", 0, 10, "unused"),
        ]);

        let matched = match_regions(&table, &regions).unwrap();
        assert_eq!(matched.names, vec!["a", "b"]);
        assert_eq!(matched.preds, vec![vec![3.0, 5.0], vec![0.0, 6.0]]);
    }
}
