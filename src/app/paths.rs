//! Output naming and batch input discovery.
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::Error;

const BSON_EXTENSION: &str = "bson";
const JSON_EXTENSION: &str = "json";

/// It returns the default output path for an input: the same directory and
/// file stem with a `.json` extension. The extension is appended when the
/// input has none.
#[must_use]
pub fn json_path(input: &Path) -> PathBuf {
    input.with_extension(JSON_EXTENSION)
}

/// It lists the `.bson` regular files in a directory, sorted by path.
///
/// The scan is not recursive and the extension match ignores case.
///
/// # Errors
///
/// Will return an error if the directory or one of its entries can't be
/// read.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let scan_error = |source| Error::ScanDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs = Vec::new();

    for entry in fs::read_dir(dir).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let path = entry.path();

        if path.is_file() && has_bson_extension(&path) {
            inputs.push(path);
        }
    }

    inputs.sort();

    Ok(inputs)
}

fn has_bson_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BSON_EXTENSION))
}
