use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::*;

use gpred_accuracy::{AccuracyError, AccuracyOptions, SourceDirs, evaluate, read_cell_types};
use gpred_core::models::GenomicSpan;
use gpred_io::{PREDICTIONS_FILE_NAME, PredictionShape, PredictionWriter};

const CT1_PREDS: [f32; 5] = [1.0, 3.0, 7.0, 15.0, 31.0];
const CT2_PREDS: [f32; 5] = [4.0, 0.5, 2.0, 9.0, 1.0];
const CT1_SIGNAL: [f64; 5] = [3.0, 7.0, 15.0, 31.0, 63.0];

struct Layout {
    _tempdir: tempfile::TempDir,
    predict_dir: PathBuf,
    primary: PathBuf,
    fallback: PathBuf,
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn write_predictions(dir: &Path) {
    write_predictions_with(dir, &CT2_PREDS);
}

fn write_predictions_with(dir: &Path, ct2_preds: &[f32; 5]) {
    let shape = PredictionShape {
        site_bins: 1,
        depth: 2,
        summed: false,
    };
    let mut writer = PredictionWriter::create(dir.join(PREDICTIONS_FILE_NAME), shape).unwrap();
    // reverse order, plus one row with no region
    for (index, i) in (0..5).rev().enumerate() {
        let span = GenomicSpan::new("chr1", i as i64 * 100, i as i64 * 100 + 100);
        writer
            .write_row(index, &span, &[CT1_PREDS[i], ct2_preds[i]])
            .unwrap();
    }
    writer
        .write_row(5, &GenomicSpan::new("chr9", 0, 100), &[100.0, 100.0])
        .unwrap();
    writer.finish().unwrap();
}

fn write_sources(dir: &Path, regions_name: &str) {
    let regions: String = (0..5)
        .map(|i| format!("chr1\t{}\t{}\tr{}\n", i * 100, i * 100 + 100, i))
        .collect();
    write(&dir.join(regions_name), &regions);

    let ct1: String = CT1_SIGNAL
        .iter()
        .enumerate()
        .map(|(i, sum)| format!("r{}\t100\t100\t{}\t0\t0\n", i, sum))
        .collect();
    write(&dir.join("CT1_target_signal.out"), &ct1);

    let ct2: String = (0..5).map(|i| format!("r{}\t100\t0\t0\t0\t0\n", i)).collect();
    write(&dir.join("CT2_target_signal.out"), &ct2);
}

#[fixture]
fn layout() -> Layout {
    let tempdir = tempfile::tempdir().unwrap();
    let predict_dir = tempdir.path().join("model").join("predict_beds");
    let primary = tempdir.path().join("targets");
    let fallback = tempdir.path().join("more_targets");

    write_predictions(&predict_dir.join("c1"));
    write_predictions(&predict_dir.join("c2"));
    write_sources(&primary.join("c1"), "predict_regions.bed");
    write_sources(&fallback.join("c2"), "c2_test_chrs.bed");

    Layout {
        _tempdir: tempdir,
        predict_dir,
        primary,
        fallback,
    }
}

fn options(layout: &Layout, fallback: bool, cell_types: &[&str]) -> AccuracyOptions {
    AccuracyOptions {
        predict_dir: layout.predict_dir.clone(),
        sources: SourceDirs::new(
            layout.primary.clone(),
            fallback.then(|| layout.fallback.clone()),
            false,
        ),
        cell_types: cell_types.iter().map(|c| c.to_string()).collect(),
    }
}

#[rstest]
fn test_identical_clusters_give_identical_rows(layout: Layout) {
    let matrix = evaluate(&options(&layout, true, &["CT1", "CT2"])).unwrap();

    assert_eq!(matrix.clusters, vec!["c1", "c2"]);
    assert_eq!(matrix.get("c1", "CT1"), Some(1.0));
    assert_eq!(matrix.get("c2", "CT1"), Some(1.0));
    assert!(matrix.get("c1", "CT2").unwrap().is_nan());
    assert!(matrix.get("c2", "CT2").unwrap().is_nan());
}

#[rstest]
fn test_tsv_keeps_nan(layout: Layout) {
    let matrix = evaluate(&options(&layout, true, &["CT1", "CT2"])).unwrap();
    let output = layout.predict_dir.join("accuracy.tsv");
    matrix.to_tsv(&output).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "\tCT1\tCT2\nc1\t1\tNaN\nc2\t1\tNaN\n"
    );
}

#[rstest]
fn test_all_zero_predictions_and_targets_give_nan(layout: Layout) {
    write_predictions_with(&layout.predict_dir.join("c1"), &[0.0; 5]);
    let matrix = evaluate(&options(&layout, true, &["CT1", "CT2"])).unwrap();

    assert_eq!(matrix.get("c1", "CT1"), Some(1.0));
    assert!(matrix.get("c1", "CT2").unwrap().is_nan());

    let mut out = Vec::new();
    matrix.write_tsv(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\tCT1\tCT2\nc1\t1\tNaN\nc2\t1\tNaN\n"
    );
}

#[rstest]
fn test_missing_fallback_is_an_error(layout: Layout) {
    let result = evaluate(&options(&layout, false, &["CT1", "CT2"]));
    assert!(matches!(result, Err(AccuracyError::MissingSource { .. })));
}

#[rstest]
fn test_cell_types_must_match_channels(layout: Layout) {
    let result = evaluate(&options(&layout, true, &["CT1", "CT2", "CT3"]));
    assert!(matches!(
        result,
        Err(AccuracyError::DepthMismatch {
            depth: 2,
            cell_types: 3,
            ..
        })
    ));
}

#[rstest]
fn test_missing_signal_for_region(layout: Layout) {
    write(
        &layout.primary.join("c1").join("CT2_target_signal.out"),
        "r0\t100\t0\t0\t0\t0\n",
    );
    let result = evaluate(&options(&layout, true, &["CT1", "CT2"]));
    assert!(matches!(result, Err(AccuracyError::MissingSignal { .. })));
}

#[rstest]
fn test_read_cell_types() {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("targets.txt");
    write(
        &path,
        "index\tgenome\tidentifier\tfile\n0\t0\tCT1\ta.w5\n1\t0\tCT2\tb.w5\n",
    );

    assert_eq!(read_cell_types(&path).unwrap(), vec!["CT1", "CT2"]);

    let quoted = tempdir.path().join("quoted.txt");
    write(&quoted, "index\tidentifier\n0\t\"CT1\"\n");
    assert_eq!(read_cell_types(&quoted).unwrap(), vec!["CT1"]);

    let bad = tempdir.path().join("bad.txt");
    write(&bad, "index\tfile\n0\ta.w5\n");
    assert!(matches!(
        read_cell_types(&bad),
        Err(AccuracyError::MissingColumn { .. })
    ));
}
