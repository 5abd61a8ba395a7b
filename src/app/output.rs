//! Output files and the overwrite policy.
use std::{
    fs::OpenOptions,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::error::Error;

/// It fails when the destination already exists and overwriting is not
/// allowed.
///
/// # Errors
///
/// Will return [`Error::OutputExists`] if the file exists and `overwrite` is
/// not set.
pub fn check_destination(path: &Path, overwrite: bool) -> Result<(), Error> {
    if !overwrite && path.exists() {
        return Err(Error::OutputExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// It writes the contents to a file.
///
/// Without `overwrite` the file is created with `create_new`, so a file
/// created after [`check_destination`] is still never replaced.
///
/// # Errors
///
/// Will return an error if the file exists and `overwrite` is not set, or if
/// it can't be created or written.
pub fn write_file(path: &Path, overwrite: bool, contents: &[u8]) -> Result<(), Error> {
    let mut options = OpenOptions::new();
    options.write(true);

    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let file = options.open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            Error::OutputExists {
                path: path.to_path_buf(),
            }
        } else {
            Error::Output {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut writer = BufWriter::new(file);

    writer
        .write_all(contents)
        .and_then(|()| writer.flush())
        .map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })
}
