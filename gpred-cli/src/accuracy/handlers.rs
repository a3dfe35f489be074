use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use gpred_accuracy::{AccuracyOptions, SourceDirs, default_predict_dir, evaluate, read_cell_types};

pub fn run_accuracy(matches: &ArgMatches) -> Result<()> {
    let output_file = matches
        .get_one::<PathBuf>("output_file")
        .unwrap_or_else(|| unreachable!("output_file is a required argument"));
    let targets_dir = matches
        .get_one::<PathBuf>("targets_dir")
        .unwrap_or_else(|| unreachable!("targets_dir is a required argument"));
    let targets_file = matches
        .get_one::<PathBuf>("targets_file")
        .unwrap_or_else(|| unreachable!("targets_file is a required argument"));
    let fallback_dir = matches.get_one::<PathBuf>("fallback_dir");
    let blocklist = matches.get_flag("blocklist");

    let predict_dir = matches
        .get_one::<PathBuf>("predict_dir")
        .cloned()
        .unwrap_or_else(|| default_predict_dir(output_file));

    let cell_types = read_cell_types(targets_file)
        .with_context(|| format!("Failed to read cell types from {}", targets_file.display()))?;

    let options = AccuracyOptions {
        predict_dir,
        sources: SourceDirs::new(targets_dir, fallback_dir, blocklist),
        cell_types,
    };

    let matrix = evaluate(&options).with_context(|| {
        format!(
            "Failed to evaluate predictions in {}",
            options.predict_dir.display()
        )
    })?;

    matrix
        .to_tsv(output_file)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;
    log::info!(
        "Wrote accuracy of {} clusters to {}",
        matrix.len(),
        output_file.display()
    );

    Ok(())
}
