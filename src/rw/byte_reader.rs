//! A reader that reads bytes from an in-memory input.
//!
//! Every read is bounds-checked: reading past the end of the input returns
//! `None` and leaves the position unchanged.

/// Number of input bytes returned by [`ByteReader::captured_bytes_before`].
const CAPTURE_LEN: usize = 16;

/// A cursor over a byte slice with little-endian primitive readers.
pub struct ByteReader<'a> {
    /// The whole input.
    input: &'a [u8],

    /// Offset of the next byte to read.
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// It reads one byte from the input.
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// It reads `len` bytes from the input.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.input.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// It reads a fixed size array from the input.
    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0; N];
        array.copy_from_slice(bytes);
        Some(array)
    }

    pub fn read_i32_le(&mut self) -> Option<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_i64_le(&mut self) -> Option<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    pub fn read_u64_le(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_f64_le(&mut self) -> Option<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// It reads bytes up to the next null byte, consuming the null byte too.
    ///
    /// The returned slice does not include the terminator. Returns `None`
    /// when there is no null byte before the end of the input.
    pub fn read_until_null(&mut self) -> Option<&'a [u8]> {
        let rest = self.input.get(self.pos..)?;
        let len = rest.iter().position(|byte| *byte == 0)?;
        let bytes = &rest[..len];
        self.pos += len + 1;
        Some(bytes)
    }

    /// Offset of the next byte to read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Returns a copy of the bytes read right before `pos`.
    #[must_use]
    pub fn captured_bytes_before(&self, pos: usize) -> Vec<u8> {
        let end = pos.min(self.input.len());
        let start = end.saturating_sub(CAPTURE_LEN);
        self.input[start..end].to_vec()
    }
}
