//! Run with:
//!
//! ```not_rust
//! cargo run --example convert_file -- -i ./tests/fixtures/sample.bson -o output.json
//! ```
//!
//! It creates `output.json` with the sample document. Pass `--canonical` to
//! wrap every number.
use std::path::PathBuf;

use bson2json::{app::convert_file, mapper::Mode};
use clap::{Arg, ArgAction, Command};

fn main() {
    let matches = Command::new("convert_file")
        .version("0.1.0")
        .about("Converts a BSON file to a JSON file")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .required(true)
                .help("Input file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file"),
        )
        .arg(
            Arg::new("canonical")
                .long("canonical")
                .action(ArgAction::SetTrue)
                .help("Canonical Extended JSON"),
        )
        .get_matches();

    let Some(input) = matches.get_one::<String>("input").map(PathBuf::from) else {
        eprintln!("Error: missing input file path. Provide a file path with -i or --input");
        std::process::exit(1);
    };

    let output = matches.get_one::<String>("output").map(PathBuf::from);

    let mode = if matches.get_flag("canonical") {
        Mode::Canonical
    } else {
        Mode::Relaxed
    };

    match convert_file(&input, output.as_deref(), false, mode) {
        Ok(output) => println!("{}", output.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
