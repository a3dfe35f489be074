use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub const ACCURACY_CMD: &str = "accuracy";

pub fn create_accuracy_cli() -> Command {
    Command::new(ACCURACY_CMD)
        .about("Correlate per-cluster predictions with target signal and write a clusters x cell types accuracy matrix.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("output_file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Accuracy matrix to write (tab-separated)"),
        )
        .arg(
            Arg::new("targets_dir")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory with region and target signal files per cluster"),
        )
        .arg(
            Arg::new("fallback_dir")
                .value_parser(value_parser!(PathBuf))
                .help("Directory searched when a file is missing from the targets directory"),
        )
        .arg(
            Arg::new("targets_file")
                .short('t')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Targets table; its identifier column names the cell types"),
        )
        .arg(
            Arg::new("blocklist")
                .short('b')
                .long("blocklist")
                .action(ArgAction::SetTrue)
                .help("Use the blocklist filtered region and signal files"),
        )
        .arg(
            Arg::new("predict_dir")
                .long("predict-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Directory with one prediction sub-directory per cluster [default: predict_beds next to the output]"),
        )
}
