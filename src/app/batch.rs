//! Batch mode: many input files, one JSON file each.
//!
//! Files are converted one after another. A failing file is reported and the
//! run goes on with the next one.
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::warn;

use super::{convert_file, paths, STDOUT_LABEL};
use crate::{error::Error, mapper::Mode};

/// Exit code when every file was converted.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when the run completed but some files failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

/// Options for the `batch` mode.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Inputs. When empty, `dir` is scanned for `.bson` files.
    pub files: Vec<PathBuf>,
    pub dir: PathBuf,
    pub overwrite: bool,
    pub mode: Mode,
}

/// The tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

impl Summary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.converted + self.failed
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL_FAILURE
        }
    }
}

/// It runs the `batch` mode printing progress to stdout.
///
/// # Errors
///
/// Will return an error if the directory can't be scanned or the progress
/// can't be printed.
pub fn run(options: &BatchOptions) -> Result<Summary, Error> {
    run_with(options, io::stdout().lock())
}

/// It runs the `batch` mode printing progress to the given output.
///
/// Per file failures are reported and counted, not returned.
///
/// # Errors
///
/// Will return an error if the directory can't be scanned or the progress
/// can't be printed.
pub fn run_with<W: Write>(options: &BatchOptions, mut out: W) -> Result<Summary, Error> {
    let inputs = if options.files.is_empty() {
        paths::scan_directory(&options.dir)?
    } else {
        options.files.clone()
    };

    let mut summary = Summary::default();

    for input in &inputs {
        print(&mut out, format_args!("Processing: {}", input.display()))?;

        match convert_file(input, None, options.overwrite, options.mode) {
            Ok(output) => {
                summary.converted += 1;
                print(&mut out, format_args!("Success: {}", output.display()))?;
            }
            Err(err) => {
                summary.failed += 1;
                warn!(input = %input.display(), %err, "conversion failed");
                print(&mut out, format_args!("Failed: {}: {err}", input.display()))?;
            }
        }
    }

    print(
        &mut out,
        format_args!(
            "Converted {} of {} files ({} failed)",
            summary.converted,
            summary.total(),
            summary.failed
        ),
    )?;

    Ok(summary)
}

fn print<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<(), Error> {
    writeln!(out, "{line}").map_err(|source| Error::Output {
        path: Path::new(STDOUT_LABEL).to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {

    mod the_summary {
        use crate::app::batch::Summary;

        #[test]
        fn it_should_exit_with_zero_when_every_file_was_converted() {
            let summary = Summary {
                converted: 3,
                failed: 0,
            };

            assert_eq!(summary.exit_code(), 0);
        }

        #[test]
        fn it_should_exit_with_two_when_some_file_failed() {
            let summary = Summary {
                converted: 1,
                failed: 1,
            };

            assert_eq!(summary.total(), 2);
            assert_eq!(summary.exit_code(), 2);
        }

        #[test]
        fn it_should_exit_with_zero_when_there_was_nothing_to_convert() {
            assert_eq!(Summary::default().exit_code(), 0);
        }
    }

    mod running {
        use std::fs;

        use tempfile::tempdir;

        use crate::{
            app::batch::{run_with, BatchOptions, Summary},
            error::Error,
            test::DocumentBuilder,
        };

        fn run_and_capture(options: &BatchOptions) -> (Summary, String) {
            let mut out = Vec::new();
            let summary = run_with(options, &mut out).unwrap();
            (summary, String::from_utf8(out).unwrap())
        }

        #[test]
        fn it_should_isolate_failures_per_file() {
            let temp_dir = tempdir().unwrap();
            let valid = temp_dir.path().join("a.bson");
            let truncated = temp_dir.path().join("b.bson");
            let bytes = DocumentBuilder::new().string("name", "ada").build();
            fs::write(&valid, &bytes).unwrap();
            fs::write(&truncated, &bytes[..bytes.len() - 4]).unwrap();

            let (summary, out) = run_and_capture(&BatchOptions {
                dir: temp_dir.path().to_path_buf(),
                ..BatchOptions::default()
            });

            assert_eq!(
                summary,
                Summary {
                    converted: 1,
                    failed: 1
                }
            );
            assert!(out.contains(&format!("Processing: {}", valid.display())));
            assert!(out.contains(&format!(
                "Success: {}",
                temp_dir.path().join("a.json").display()
            )));
            assert!(out.contains(&format!("Failed: {}: ", truncated.display())));
            assert!(out.contains("input pos"));
            assert!(out.ends_with("Converted 1 of 2 files (1 failed)\n"));
            assert_eq!(
                fs::read_to_string(temp_dir.path().join("a.json")).unwrap(),
                "{\n  \"name\": \"ada\"\n}\n"
            );
            assert!(!temp_dir.path().join("b.json").exists());
        }

        #[test]
        fn it_should_convert_the_given_files_only() {
            let temp_dir = tempdir().unwrap();
            let wanted = temp_dir.path().join("wanted.bson");
            fs::write(&wanted, DocumentBuilder::new().build()).unwrap();
            fs::write(temp_dir.path().join("other.bson"), DocumentBuilder::new().build()).unwrap();

            let (summary, _) = run_and_capture(&BatchOptions {
                files: vec![wanted],
                dir: temp_dir.path().to_path_buf(),
                ..BatchOptions::default()
            });

            assert_eq!(summary.converted, 1);
            assert!(temp_dir.path().join("wanted.json").exists());
            assert!(!temp_dir.path().join("other.json").exists());
        }

        #[test]
        fn it_should_report_existing_outputs_as_failures() {
            let temp_dir = tempdir().unwrap();
            fs::write(temp_dir.path().join("a.bson"), DocumentBuilder::new().build()).unwrap();
            fs::write(temp_dir.path().join("a.json"), b"first").unwrap();

            let (summary, out) = run_and_capture(&BatchOptions {
                dir: temp_dir.path().to_path_buf(),
                ..BatchOptions::default()
            });

            assert_eq!(summary.failed, 1);
            assert!(out.contains("already exists"));
            assert_eq!(fs::read(temp_dir.path().join("a.json")).unwrap(), b"first");
        }

        #[test]
        fn it_should_fail_when_the_directory_can_not_be_scanned() {
            let temp_dir = tempdir().unwrap();

            let result = run_with(
                &BatchOptions {
                    dir: temp_dir.path().join("missing"),
                    ..BatchOptions::default()
                },
                Vec::new(),
            );

            assert!(matches!(result, Err(Error::ScanDirectory { .. })));
        }
    }
}
