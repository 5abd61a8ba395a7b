//! File and stream orchestration for the command line tool.
//!
//! It reads whole inputs into memory, converts them with the library and
//! writes the JSON text to a file or to stdout, applying the overwrite
//! policy. The `io` mode handles one input, the `batch` mode many.
use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{ConversionError, Error},
    mapper::Mode,
    write_json,
};

pub mod batch;
pub mod io;
pub mod output;
pub mod paths;

/// The name used in messages for the standard input.
pub const STDIN_LABEL: &str = "<stdin>";

/// The name used in messages for the standard output.
pub const STDOUT_LABEL: &str = "<stdout>";

/// It converts one BSON file into a JSON file and returns the output path.
///
/// The destination is checked before the input is read, so an existing
/// output is rejected without converting anything.
///
/// # Errors
///
/// Will return an error if the output exists and `overwrite` is not set, if
/// the input can't be read, is empty or is not valid BSON, or if the output
/// can't be written.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    overwrite: bool,
    mode: Mode,
) -> Result<PathBuf, Error> {
    let destination = output.map_or_else(|| paths::json_path(input), Path::to_path_buf);

    output::check_destination(&destination, overwrite)?;

    let bytes = read_file(input)?;

    let json = convert(&bytes, input, &destination, mode)?;

    output::write_file(&destination, overwrite, &json)?;

    debug!(input = %input.display(), output = %destination.display(), "file converted");

    Ok(destination)
}

/// It reads a whole input file, rejecting empty ones.
fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    let bytes = fs::read(path).map_err(|source| Error::Input {
        path: path.to_path_buf(),
        source,
    })?;

    ensure_not_empty(bytes, path)
}

fn ensure_not_empty(bytes: Vec<u8>, path: &Path) -> Result<Vec<u8>, Error> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    debug!(input = %path.display(), len = bytes.len(), "input read");

    Ok(bytes)
}

/// It converts the input bytes into JSON text held in memory, so nothing is
/// written for an invalid input.
fn convert(bytes: &[u8], input: &Path, destination: &Path, mode: Mode) -> Result<Vec<u8>, Error> {
    let mut json = Vec::new();

    write_json(bytes, mode, &mut json).map_err(|err| {
        let path = match err {
            ConversionError::Validation(_) => input,
            ConversionError::Encoding(_) => destination,
        };
        Error::from_conversion(path, err)
    })?;

    Ok(json)
}
