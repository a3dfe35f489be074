use std::path::PathBuf;
use std::str::FromStr;

use clap::{Arg, ArgAction, Command, value_parser};

use gpred_predict::consts::DEFAULT_OUT_DIR;
use gpred_tracks::TrackFormat;

pub const PREDICT_CMD: &str = "predict";

/// Parse a comma separated list such as `0,3,7`.
pub fn parse_list<T: FromStr>(value: &str) -> Result<Vec<T>, String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<T>()
                .map_err(|_| format!("invalid list item '{}'", item))
        })
        .collect()
}

fn parse_track_format(value: &str) -> Result<TrackFormat, String> {
    value.parse::<TrackFormat>().map_err(|e| e.to_string())
}

fn path_arg(name: &'static str) -> Arg {
    Arg::new(name).value_parser(value_parser!(PathBuf))
}

pub fn create_predict_cli() -> Command {
    Command::new(PREDICT_CMD)
        .about("Predict sequence activity for BED intervals, routing each interval to model A or B by its binary classifier score.")
        .arg_required_else_help(true)
        .arg(path_arg("params_a").required(true).help("Parameters of model A (peaks)"))
        .arg(path_arg("model_a").required(true).help("Trained model A"))
        .arg(path_arg("params_b").required(true).help("Parameters of model B (non-peaks)"))
        .arg(path_arg("model_b").required(true).help("Trained model B"))
        .arg(
            path_arg("binary_preds")
                .required(true)
                .help("Binary classifier predictions for the intervals"),
        )
        .arg(path_arg("bed_file").required(true).help("Intervals to predict"))
        .arg(
            Arg::new("head")
                .long("head")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Model head to predict with"),
        )
        .arg(
            Arg::new("bigwig_indexes")
                .short('b')
                .value_parser(parse_list::<usize>)
                .help("Comma separated target indexes to write tracks for"),
        )
        .arg(
            Arg::new("embed_layer")
                .short('e')
                .value_parser(value_parser!(usize))
                .help("Model output to use as an embedding instead of the head"),
        )
        .arg(
            path_arg("genome_fasta")
                .short('f')
                .help("Genome FASTA, plain or gzipped"),
        )
        .arg(
            path_arg("chrom_sizes")
                .short('g')
                .help("Chromosome sizes, required for tracks"),
        )
        .arg(
            Arg::new("site_length")
                .short('l')
                .value_parser(value_parser!(usize))
                .help("Length of the predicted site in bases [default: the model's output span]"),
        )
        .arg(
            path_arg("out_dir")
                .short('o')
                .default_value(DEFAULT_OUT_DIR)
                .help("Output directory"),
        )
        .arg(
            Arg::new("processes")
                .short('p')
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Number of processes"),
        )
        .arg(
            Arg::new("rc")
                .long("rc")
                .action(ArgAction::SetTrue)
                .help("Average predictions with the reverse complement"),
        )
        .arg(
            Arg::new("sum")
                .short('s')
                .long("sum")
                .action(ArgAction::SetTrue)
                .help("Sum predictions over the site"),
        )
        .arg(
            Arg::new("shifts")
                .long("shifts")
                .value_parser(parse_list::<i64>)
                .allow_hyphen_values(true)
                .default_value("0")
                .help("Comma separated sequence shifts to average over"),
        )
        .arg(
            path_arg("targets_file")
                .short('t')
                .help("Targets table; keeps only the listed targets"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .value_parser(value_parser!(f32))
                .default_value("0.5")
                .help("Binary score at or above which an interval goes to model A"),
        )
        .arg(
            Arg::new("track_format")
                .long("track-format")
                .value_parser(parse_track_format)
                .default_value("bigwig")
                .help("Track file format (bigwig or bedgraph)"),
        )
}
