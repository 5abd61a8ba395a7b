//! Single input mode: one file or stdin, to a file or stdout.
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{convert, ensure_not_empty, output, paths, read_file, STDIN_LABEL, STDOUT_LABEL};
use crate::{error::Error, mapper::Mode};

/// Options for the `io` mode.
#[derive(Debug, Clone, Default)]
pub struct IoOptions {
    /// Input file. Stdin when missing.
    pub input: Option<PathBuf>,
    /// Output file. It takes precedence over `use_std_out`.
    pub output: Option<PathBuf>,
    pub use_std_out: bool,
    pub overwrite: bool,
    pub mode: Mode,
}

/// Where the JSON text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl IoOptions {
    /// It resolves the destination: the explicit output, then stdout, then
    /// the input path with a `.json` extension.
    ///
    /// # Errors
    ///
    /// Will return [`Error::MissingInput`] if there is no input file, no
    /// output file and stdout was not selected.
    pub fn destination(&self) -> Result<Destination, Error> {
        match (&self.output, self.use_std_out, &self.input) {
            (Some(output), _, _) => Ok(Destination::File(output.clone())),
            (None, true, _) => Ok(Destination::Stdout),
            (None, false, Some(input)) => Ok(Destination::File(paths::json_path(input))),
            (None, false, None) => Err(Error::MissingInput),
        }
    }
}

/// It runs the `io` mode with the process stdin and stdout.
///
/// # Errors
///
/// Will return the first error found.
pub fn run(options: &IoOptions) -> Result<Destination, Error> {
    run_with(options, io::stdin().lock(), io::stdout().lock())
}

/// It runs the `io` mode reading from and writing to the given streams when
/// no files are involved.
///
/// The destination is resolved and checked before any input is read.
///
/// # Errors
///
/// Will return the first error found.
pub fn run_with<R: Read, W: Write>(
    options: &IoOptions,
    stdin: R,
    stdout: W,
) -> Result<Destination, Error> {
    let destination = options.destination()?;

    if let Destination::File(path) = &destination {
        output::check_destination(path, options.overwrite)?;
    }

    let (bytes, input_path) = match &options.input {
        Some(path) => (read_file(path)?, path.clone()),
        None => (read_stdin(stdin)?, PathBuf::from(STDIN_LABEL)),
    };

    match &destination {
        Destination::File(path) => {
            let json = convert(&bytes, &input_path, path, options.mode)?;
            output::write_file(path, options.overwrite, &json)?;
        }
        Destination::Stdout => {
            let json = convert(&bytes, &input_path, Path::new(STDOUT_LABEL), options.mode)?;
            write_stdout(stdout, &json)?;
        }
    }

    debug!(input = %input_path.display(), ?destination, "input converted");

    Ok(destination)
}

fn read_stdin<R: Read>(mut stdin: R) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();

    stdin.read_to_end(&mut bytes).map_err(|source| Error::Input {
        path: PathBuf::from(STDIN_LABEL),
        source,
    })?;

    ensure_not_empty(bytes, Path::new(STDIN_LABEL))
}

fn write_stdout<W: Write>(mut stdout: W, json: &[u8]) -> Result<(), Error> {
    stdout
        .write_all(json)
        .and_then(|()| stdout.flush())
        .map_err(|source| Error::Output {
            path: PathBuf::from(STDOUT_LABEL),
            source,
        })
}
