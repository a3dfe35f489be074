mod accuracy;
mod predict;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "gpred";
    pub const BIN_NAME: &str = "gpred";
    pub const DEFAULT_VERBOSITY: &str = "info";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Predict genomic sequence activity with a pair of models routed by a binary classifier, and score the predictions against experimental signal.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .global(true)
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Logging level. Defaults to RUST_LOG, then info."),
        )
        .subcommand(predict::cli::create_predict_cli())
        .subcommand(accuracy::cli::create_accuracy_cli())
}

fn init_logging(matches: &ArgMatches) {
    let env = env_logger::Env::default().default_filter_or(consts::DEFAULT_VERBOSITY);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = matches.get_one::<String>("verbosity") {
        builder.parse_filters(level);
    }
    builder.init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);

    match matches.subcommand() {
        //
        // PREDICT
        //
        Some((predict::cli::PREDICT_CMD, matches)) => {
            predict::handlers::run_predict(matches)?;
        }

        //
        // ACCURACY
        //
        Some((accuracy::cli::ACCURACY_CMD, matches)) => {
            accuracy::handlers::run_accuracy(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
