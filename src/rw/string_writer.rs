//! A writer that writes to an output implementing `std::fmt::Write`.
use std::fmt::Write;

use ringbuffer::{AllocRingBuffer, RingBuffer};

use super::{error::Error, writer::Writer};

/// Number of latest output chars kept for error reports.
const CAPTURE_CAPACITY: usize = 1024;

/// A writer that writes to an output implementing `std::fmt::Write`.
///
/// It's wrapper of a basic writer that also counts the written bytes and
/// captures the latest written chars for error reports.
pub struct StringWriter<W: Write> {
    /// A `std::fmt::Write` writer.
    writer: W,

    /// Number of bytes written to the output.
    output_byte_counter: u64,

    /// A buffer to capture the latest chars written to the output.
    captured_chars: AllocRingBuffer<char>,
}

impl<W: Write> StringWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output_byte_counter: 0,
            captured_chars: AllocRingBuffer::new(CAPTURE_CAPACITY),
        }
    }
}

impl<W: Write> Writer for StringWriter<W> {
    /// Only ASCII structural bytes are written this way.
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        let c = byte as char;

        if let Err(source) = self.writer.write_char(c) {
            return Err(Error::Fmt {
                source,
                context: self.context(Some(byte)),
            });
        }

        self.output_byte_counter += 1;

        self.captured_chars.push(c);

        Ok(())
    }

    fn write_str(&mut self, value: &str) -> Result<(), Error> {
        if let Err(source) = self.writer.write_str(value) {
            return Err(Error::Fmt {
                source,
                context: self.context(value.bytes().next()),
            });
        }

        self.output_byte_counter += value.len() as u64;

        for c in value.chars() {
            self.captured_chars.push(c);
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn output_byte_counter(&self) -> u64 {
        self.output_byte_counter
    }

    fn captured_bytes(&self) -> Vec<u8> {
        self.captured_chars
            .iter()
            .collect::<String>()
            .into_bytes()
    }
}
