//! Decoder errors.
//!
//! Every structural fault is reported as an [`Error`]: what went wrong
//! ([`ErrorKind`]) and where ([`ReadContext`]).
use std::fmt;

use thiserror::Error;

use crate::bson::ElementType;

/// A structural fault found while decoding a BSON buffer.
#[derive(Debug, Error, PartialEq)]
#[error("{kind}; {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: ReadContext,
}

impl Error {
    /// Offset in the input where the fault was detected.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.context.pos
    }

    /// Dotted path of the key being parsed, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.context.key.as_deref()
    }

    /// Human readable reason, without the read context.
    #[must_use]
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

/// Errors that can occur while decoding a BSON document.
#[derive(Debug, Error, PartialEq)]
pub enum ErrorKind {
    /// The input can't even hold the 4-byte length prefix.
    #[error("Input is too short for a document length prefix: {available} bytes")]
    InputTooShort { available: usize },

    /// A document needs at least the prefix and the terminator.
    #[error("Invalid document length {declared}, the minimum is 5")]
    InvalidDocumentLength { declared: i32 },

    #[error("Declared document length {declared} exceeds the {available} bytes available")]
    DeclaredLengthExceedsInput { declared: i32, available: usize },

    /// The byte at the declared end of the document is not a null byte.
    #[error("Document is not terminated by a null byte")]
    MissingDocumentTerminator,

    /// The elements walked do not end where the length prefix says.
    #[error("Document length prefix {declared} does not match the {consumed} bytes consumed")]
    DocumentLengthMismatch { declared: i32, consumed: usize },

    #[error("Unrecognized element type tag")]
    UnrecognizedElementType,

    #[error("Unexpected end of input parsing {0} value")]
    UnexpectedEndOfInput(ElementType),

    #[error("Unterminated element key")]
    UnterminatedKey,

    #[error("Element key is not valid UTF-8")]
    InvalidUtf8Key,

    /// Booleans must be encoded as 0x00 or 0x01.
    #[error("Invalid boolean byte at position {pos}, expected 0x00 or 0x01")]
    InvalidBooleanByte { pos: u64 },

    #[error("Invalid string length {declared}, it must include the null terminator")]
    InvalidStringLength { declared: i32 },

    #[error("String is not null terminated at the declared length")]
    StringNotNullTerminated,

    #[error("{0} value is not valid UTF-8")]
    InvalidUtf8(ElementType),

    #[error("Unterminated C string parsing {0} value")]
    UnterminatedCString(ElementType),

    #[error("Invalid binary length {declared}")]
    InvalidBinaryLength { declared: i32 },

    /// Subtype 0x02 repeats the length inside the payload.
    #[error("Old binary inner length {inner} does not match the payload length {expected}")]
    InvalidOldBinaryLength { inner: i32, expected: usize },

    #[error("Code with scope length {declared} does not match the {consumed} bytes consumed")]
    CodeWithScopeLengthMismatch { declared: i32, consumed: usize },

    #[error("{extra} trailing bytes after the document")]
    TrailingBytes { extra: usize },

    #[error("Document nesting exceeds the maximum depth of {max}")]
    MaxNestingDepthExceeded { max: usize },
}

/// The reader context when the error occurred.
#[derive(Debug, PartialEq)]
pub struct ReadContext {
    /// The read byte that caused the error if any.
    pub byte: Option<u8>,

    /// The position where the error was detected.
    pub pos: u64,

    /// Dotted path of the element key being parsed if known.
    pub key: Option<String>,

    /// The latest bytes read from input before `pos`.
    pub latest_bytes: Vec<u8>,
}

impl fmt::Display for ReadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "read context:")?;

        if let Some(key) = &self.key {
            write!(f, " key `{key}`,")?;
        }

        if let Some(byte) = self.byte {
            write!(f, " byte `0x{byte:02x}`,")?;
        }

        write!(
            f,
            " input pos {}, latest input bytes dump: `{}`",
            self.pos,
            hex::encode(&self.latest_bytes)
        )
    }
}
