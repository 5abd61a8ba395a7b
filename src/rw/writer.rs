//! This module contains the `Writer` trait.

/* code-review:

   The function `write_byte` only writes JSON structural bytes: brackets,
   separators, spaces used for indentation and line breaks. Everything else
   (escaped strings, numbers, literals) goes through `write_str`.
*/

use super::error::{Error, WriteContext};

pub trait Writer {
    /// It writes one byte to the output.
    ///
    /// # Errors
    ///
    /// Will return an error if it can't write the byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Error>;

    /// It writes a string to the output.
    ///
    /// # Errors
    ///
    /// Will return an error if it can't write the string.
    fn write_str(&mut self, value: &str) -> Result<(), Error>;

    /// It flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Will return an error if the underlying output can't be flushed.
    fn flush(&mut self) -> Result<(), Error>;

    /// It return the number of bytes that have been written to the output.
    fn output_byte_counter(&self) -> u64;

    /// It returns a copy of the latest bytes that have been written to the
    /// output.
    fn captured_bytes(&self) -> Vec<u8>;

    /// It returns the write context for an error writing `byte`.
    fn context(&self, byte: Option<u8>) -> WriteContext {
        WriteContext {
            byte,
            pos: self.output_byte_counter(),
            latest_bytes: self.captured_bytes(),
        }
    }
}
