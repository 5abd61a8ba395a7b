//! Converts BSON to JSON.
//!
//! Usage:
//!
//! Using stdin and stdout:
//!
//! ```text
//! cat dump.bson | cargo run -- io --use-std-out
//! ```
//!
//! Using files:
//!
//! ```text
//! cargo run -- io -i ./dump.bson -o output.json
//! ```
//!
//! Converting every `.bson` file in a directory:
//!
//! ```text
//! cargo run -- batch --dir ./dump
//! ```
//!
//! Set `RUST_LOG=debug` to trace each stage on stderr.
use std::path::PathBuf;

use bson2json::{
    app::{
        batch::{self, BatchOptions},
        io::{self as io_mode, IoOptions},
    },
    mapper::Mode,
};
use clap::{error::ErrorKind, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    init_tracing();

    let exit_code = run();

    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("Unable to initialise logging: {err}");
    }
}

fn run() -> i32 {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("io", sub_matches)) => match io_options(sub_matches) {
            Ok(options) => io_mode::run(&options).map(|_| 0),
            Err(usage_error) => usage_error.exit(),
        },
        Some(("batch", sub_matches)) => {
            batch::run(&batch_options(sub_matches)).map(|summary| summary.exit_code())
        }
        _ => batch::run(&BatchOptions {
            dir: PathBuf::from("."),
            ..BatchOptions::default()
        })
        .map(|summary| summary.exit_code()),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn cli() -> Command {
    Command::new("bson2json")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts BSON to JSON")
        .subcommand(io_command())
        .subcommand(
            Command::new("batch")
                .about("Converts many files, each one next to its input (default)")
                .arg(
                    Arg::new("files")
                        .value_name("FILES")
                        .num_args(0..)
                        .help("Input files (defaults to the .bson files in --dir)"),
                )
                .arg(
                    Arg::new("dir")
                        .short('d')
                        .long("dir")
                        .value_name("DIR")
                        .default_value(".")
                        .help("Directory scanned when no files are given"),
                )
                .arg(overwrite_arg())
                .arg(canonical_arg()),
        )
}

fn io_command() -> Command {
    Command::new("io")
        .about("Converts one input, a file or stdin, to a file or stdout")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("PATH")
                .help("Optional input file (defaults to stdin)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Optional output file (defaults to the input path with a .json extension)"),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATHS")
                .num_args(0..=2)
                .help("Input then output file, for whichever of --input and --output is not given"),
        )
        .arg(
            Arg::new("use_std_out")
                .long("use-std-out")
                .action(ArgAction::SetTrue)
                .help("Write to stdout when no output file is given"),
        )
        .arg(overwrite_arg())
        .arg(canonical_arg())
}

fn overwrite_arg() -> Arg {
    Arg::new("overwrite")
        .short('f')
        .long("overwrite")
        .action(ArgAction::SetTrue)
        .help("Replace existing output files")
}

fn canonical_arg() -> Arg {
    Arg::new("canonical")
        .long("canonical")
        .action(ArgAction::SetTrue)
        .help("Use canonical Extended JSON instead of relaxed")
}

fn mode(matches: &ArgMatches) -> Mode {
    if matches.get_flag("canonical") {
        Mode::Canonical
    } else {
        Mode::Relaxed
    }
}

fn path_flag(matches: &ArgMatches, flag: &str) -> Option<PathBuf> {
    matches.get_one::<String>(flag).map(PathBuf::from)
}

/// Positional paths fill the input, then the output, skipping the ones
/// given as flags.
fn io_options(matches: &ArgMatches) -> Result<IoOptions, clap::Error> {
    let mut paths = matches
        .get_many::<String>("paths")
        .into_iter()
        .flatten()
        .map(PathBuf::from);

    let input = path_flag(matches, "input").or_else(|| paths.next());
    let output = path_flag(matches, "output").or_else(|| paths.next());

    if let Some(extra) = paths.next() {
        return Err(io_command().error(
            ErrorKind::TooManyValues,
            format!("unexpected path '{}': input and output are both set", extra.display()),
        ));
    }

    Ok(IoOptions {
        input,
        output,
        use_std_out: matches.get_flag("use_std_out"),
        overwrite: matches.get_flag("overwrite"),
        mode: mode(matches),
    })
}

fn batch_options(matches: &ArgMatches) -> BatchOptions {
    BatchOptions {
        files: matches
            .get_many::<String>("files")
            .map(|files| files.map(PathBuf::from).collect())
            .unwrap_or_default(),
        dir: matches
            .get_one::<String>("dir")
            .map_or_else(|| PathBuf::from("."), PathBuf::from),
        overwrite: matches.get_flag("overwrite"),
        mode: mode(matches),
    }
}
