//! Conversion and application errors.
use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{decoder, rw};

/// Errors that can occur while converting a BSON buffer into JSON text.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The input is not a well-formed BSON document.
    #[error("Invalid BSON: {0}")]
    Validation(#[from] decoder::error::Error),

    /// The JSON text could not be written.
    #[error("JSON encoding failed: {0}")]
    Encoding(#[from] rw::error::Error),
}

/// Errors raised by the file and stream orchestration.
///
/// Every variant carrying a path names the file the failure is about, so a
/// batch run can report it next to the file being processed.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file or stream can't be read.
    #[error("Unable to read input {path}: {source}")]
    Input { path: PathBuf, source: io::Error },

    #[error("Empty input: {path}")]
    EmptyInput { path: PathBuf },

    /// Neither an input file, an output file nor stdout was selected.
    #[error("Input file is required if --use-std-out is not specified")]
    MissingInput,

    #[error("Invalid BSON in {path}: {source}")]
    Validation {
        path: PathBuf,
        source: decoder::error::Error,
    },

    #[error("File already exists. Specify --overwrite to replace it: {path}")]
    OutputExists { path: PathBuf },

    /// The destination can't be created or written.
    #[error("Unable to write output {path}: {source}")]
    Output { path: PathBuf, source: io::Error },

    #[error("Unable to encode JSON for {path}: {source}")]
    Encoding {
        path: PathBuf,
        source: rw::error::Error,
    },

    /// The batch directory can't be listed.
    #[error("Unable to scan directory {path}: {source}")]
    ScanDirectory { path: PathBuf, source: io::Error },
}

impl Error {
    /// It attaches the path of the file being converted to a conversion
    /// failure.
    pub fn from_conversion(path: impl Into<PathBuf>, err: ConversionError) -> Self {
        let path = path.into();
        match err {
            ConversionError::Validation(source) => Error::Validation { path, source },
            ConversionError::Encoding(source) => Error::Encoding { path, source },
        }
    }
}
