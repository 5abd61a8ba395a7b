//! This lib contains functions to convert BSON documents into JSON text.
//!
//! There are high-level functions for common purposes that call the lower
//! level pieces: the [`decoder`], the [`mapper`] and the JSON
//! [`generators`]. You can use them directly if the high-level wrappers are
//! not suitable for your needs.
use std::io;

use error::ConversionError;
use generators::json::Generator;
use mapper::{Mapper, Mode};

pub mod app;
pub mod bson;
pub mod decoder;
pub mod error;
pub mod generators;
pub mod mapper;
pub mod rw;

/// It converts BSON bytes into a pretty JSON string using relaxed Extended
/// JSON.
///
/// # Errors
///
/// Will return an error if the input is not a valid BSON document.
pub fn try_bson_to_json(input_buffer: &[u8]) -> Result<String, ConversionError> {
    try_bson_to_json_with_mode(input_buffer, Mode::Relaxed)
}

/// It converts BSON bytes into a pretty JSON string using the given
/// Extended JSON mode.
///
/// # Errors
///
/// Will return an error if the input is not a valid BSON document.
pub fn try_bson_to_json_with_mode(
    input_buffer: &[u8],
    mode: Mode,
) -> Result<String, ConversionError> {
    let document = decoder::decode(input_buffer)?;
    let node = Mapper::new(mode).to_json(&document);

    let mut output = String::new();
    Generator::new(&node).write_str(&mut output)?;

    Ok(output)
}

/// It converts BSON bytes and writes the JSON text to any type implementing
/// `io::Write`.
///
/// Nothing is written when the input is not a valid document.
///
/// # Errors
///
/// Will return an error if the input is not a valid BSON document or if the
/// output can't be written.
pub fn write_json<W: io::Write>(
    input_buffer: &[u8],
    mode: Mode,
    output: W,
) -> Result<(), ConversionError> {
    let document = decoder::decode(input_buffer)?;
    let node = Mapper::new(mode).to_json(&document);

    Generator::new(&node).write_bytes(output)?;

    Ok(())
}
