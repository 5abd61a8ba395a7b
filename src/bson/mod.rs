//! BSON data model: documents, values and element type tags.
pub mod decimal128;
pub mod document;
pub mod value;

use derive_more::derive::Display;

pub use decimal128::Decimal128;
pub use document::Document;
pub use value::{Binary, Bson, DbPointer, JavaScriptCodeWithScope, ObjectId, Regex, Timestamp};

/// BSON element type tags, as found in the first byte of every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ElementType {
    Double,
    String,
    EmbeddedDocument,
    Array,
    Binary,
    Undefined,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    RegularExpression,
    DbPointer,
    JavaScriptCode,
    Symbol,
    JavaScriptCodeWithScope,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
}

impl ElementType {
    /// Returns the element type for a tag byte, or `None` if the tag is not
    /// a BSON type.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        let element_type = match tag {
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::EmbeddedDocument,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0A => Self::Null,
            0x0B => Self::RegularExpression,
            0x0C => Self::DbPointer,
            0x0D => Self::JavaScriptCode,
            0x0E => Self::Symbol,
            0x0F => Self::JavaScriptCodeWithScope,
            0x10 => Self::Int32,
            0x11 => Self::Timestamp,
            0x12 => Self::Int64,
            0x13 => Self::Decimal128,
            0xFF => Self::MinKey,
            0x7F => Self::MaxKey,
            _ => return None,
        };

        Some(element_type)
    }

    /// The tag byte used on the wire.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Double => 0x01,
            Self::String => 0x02,
            Self::EmbeddedDocument => 0x03,
            Self::Array => 0x04,
            Self::Binary => 0x05,
            Self::Undefined => 0x06,
            Self::ObjectId => 0x07,
            Self::Boolean => 0x08,
            Self::DateTime => 0x09,
            Self::Null => 0x0A,
            Self::RegularExpression => 0x0B,
            Self::DbPointer => 0x0C,
            Self::JavaScriptCode => 0x0D,
            Self::Symbol => 0x0E,
            Self::JavaScriptCodeWithScope => 0x0F,
            Self::Int32 => 0x10,
            Self::Timestamp => 0x11,
            Self::Int64 => 0x12,
            Self::Decimal128 => 0x13,
            Self::MinKey => 0xFF,
            Self::MaxKey => 0x7F,
        }
    }
}
