//! A writer that writes bytes to an output.
//!
//! The output is any type that implements the `std::io::Write` trait.
use std::io::BufWriter;
use std::io::Write;

use ringbuffer::AllocRingBuffer;
use ringbuffer::RingBuffer;

use super::{error::Error, writer::Writer};

/// Number of latest output bytes kept for error reports.
const CAPTURE_CAPACITY: usize = 1024;

/// A writer that writes to an output implementing `std::io::Write`.
///
/// It's wrapper of a buffered writer that also counts and captures the
/// latest written bytes, so write errors can tell where the output stopped.
pub struct ByteWriter<W: Write> {
    /// It's a buffered writer.
    writer: BufWriter<W>,

    /// Number of bytes written to the output.
    output_byte_counter: u64,

    /// A buffer to capture the latest bytes written to the output.
    captured_bytes: AllocRingBuffer<u8>,
}

impl<W: Write> ByteWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output_byte_counter: 0,
            writer: BufWriter::new(writer),
            captured_bytes: AllocRingBuffer::new(CAPTURE_CAPACITY),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if let Err(source) = self.writer.write_all(bytes) {
            return Err(Error::Io {
                source,
                context: self.context(bytes.first().copied()),
            });
        }

        for byte in bytes {
            self.captured_bytes.push(*byte);
        }

        self.output_byte_counter += bytes.len() as u64;

        Ok(())
    }
}

impl<W: Write> Writer for ByteWriter<W> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.write_all(&[byte])
    }

    fn write_str(&mut self, value: &str) -> Result<(), Error> {
        self.write_all(value.as_bytes())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|source| Error::Io {
            source,
            context: self.context(None),
        })
    }

    fn output_byte_counter(&self) -> u64 {
        self.output_byte_counter
    }

    fn captured_bytes(&self) -> Vec<u8> {
        self.captured_bytes.to_vec()
    }
}
