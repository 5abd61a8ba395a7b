//! Custom error type for I/O, formatting and JSON escaping errors.
use core::str;
use std::{fmt, io};

use thiserror::Error;

/// Custom error type for the write side of the conversion.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {source}; {context}")]
    Io {
        source: io::Error,
        context: WriteContext,
    },

    #[error("Formatting error: {source}; {context}")]
    Fmt {
        source: fmt::Error,
        context: WriteContext,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The writer context when the error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteContext {
    /// The byte that could not be written, if any.
    pub byte: Option<u8>,

    /// Number of bytes written before the failure.
    pub pos: u64,

    /// The latest bytes written to the output.
    pub latest_bytes: Vec<u8>,
}

impl fmt::Display for WriteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write context:")?;

        if let Some(byte) = self.byte {
            write!(f, " byte `0x{byte:02x}`,")?;
        }

        write!(
            f,
            " output pos {}, latest output bytes dump: `{}`",
            self.pos,
            hex::encode(&self.latest_bytes)
        )?;

        if let Ok(utf8_string) = str::from_utf8(&self.latest_bytes) {
            write!(f, " (UTF-8 string: `{utf8_string}`)")?;
        }

        Ok(())
    }
}
