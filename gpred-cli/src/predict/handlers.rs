use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use gpred_predict::{PredictInputs, PredictOptions, run_predict as predict};
use gpred_tracks::TrackFormat;

fn required_path(matches: &ArgMatches, name: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .unwrap_or_else(|| unreachable!("{} is a required argument", name))
}

pub fn inputs_from_matches(matches: &ArgMatches) -> PredictInputs {
    PredictInputs {
        params_a: required_path(matches, "params_a"),
        model_a: required_path(matches, "model_a"),
        params_b: required_path(matches, "params_b"),
        model_b: required_path(matches, "model_b"),
        binary_preds: required_path(matches, "binary_preds"),
        bed_file: required_path(matches, "bed_file"),
    }
}

pub fn options_from_matches(matches: &ArgMatches) -> PredictOptions {
    let defaults = PredictOptions::default();

    PredictOptions {
        head: matches.get_one::<usize>("head").copied().unwrap_or(defaults.head),
        track_indexes: matches
            .get_one::<Vec<usize>>("bigwig_indexes")
            .cloned()
            .unwrap_or_default(),
        embed_layer: matches.get_one::<usize>("embed_layer").copied(),
        genome_fasta: matches.get_one::<PathBuf>("genome_fasta").cloned(),
        chrom_sizes: matches.get_one::<PathBuf>("chrom_sizes").cloned(),
        site_length: matches.get_one::<usize>("site_length").copied(),
        out_dir: matches
            .get_one::<PathBuf>("out_dir")
            .cloned()
            .unwrap_or(defaults.out_dir),
        processes: matches
            .get_one::<usize>("processes")
            .copied()
            .unwrap_or(defaults.processes),
        rc: matches.get_flag("rc"),
        shifts: matches
            .get_one::<Vec<i64>>("shifts")
            .cloned()
            .unwrap_or(defaults.shifts),
        sum: matches.get_flag("sum"),
        targets_file: matches.get_one::<PathBuf>("targets_file").cloned(),
        threshold: matches
            .get_one::<f32>("threshold")
            .copied()
            .unwrap_or(defaults.threshold),
        track_format: matches
            .get_one::<TrackFormat>("track_format")
            .copied()
            .unwrap_or(defaults.track_format),
    }
}

pub fn run_predict(matches: &ArgMatches) -> Result<()> {
    let inputs = inputs_from_matches(matches);
    let options = options_from_matches(matches);

    let summary = predict(&inputs, &options).with_context(|| {
        format!(
            "Failed to predict intervals in {}",
            inputs.bed_file.display()
        )
    })?;

    log::info!(
        "Wrote {} predictions ({} peaks, {} non-peaks) to {}",
        summary.rows,
        summary.peaks,
        summary.non_peaks,
        summary.output.display()
    );
    if summary.tracks > 0 {
        log::info!("Wrote {} track files", summary.tracks);
    }

    Ok(())
}
