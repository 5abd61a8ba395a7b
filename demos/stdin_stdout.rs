//! Run with:
//!
//! ```not_rust
//! cargo run --example stdin_stdout < ./tests/fixtures/sample.bson
//! ```
//!
//! It prints the document as relaxed Extended JSON.
use std::io::{self, Read};

use bson2json::{mapper::Mode, write_json};

fn main() {
    let mut input = Vec::new();

    if let Err(e) = io::stdin().read_to_end(&mut input) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = write_json(&input, Mode::Relaxed, io::stdout().lock()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
