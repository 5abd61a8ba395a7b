//! BSON decoder and validator.
//!
//! The decoder walks the input with a bounds-checked [`ByteReader`] and
//! builds a [`Document`]. Any structural fault stops the walk and is
//! returned as an [`Error`] carrying the offset, the key path and the
//! reason. Decoding never panics on malformed input.
pub mod error;
pub mod validation;

use tracing::debug;

use crate::bson::{
    Binary, Bson, DbPointer, Decimal128, Document, ElementType, JavaScriptCodeWithScope, ObjectId,
    Regex, Timestamp,
};
use crate::rw::byte_reader::ByteReader;
use error::{Error, ErrorKind, ReadContext};
use validation::ValidationResult;

/// Maximum number of nested documents, arrays and scopes.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Length prefix plus terminator.
const MIN_DOCUMENT_LEN: i32 = 5;

const LENGTH_PREFIX_LEN: usize = 4;

/// It decodes a whole buffer holding exactly one BSON document.
///
/// # Errors
///
/// Will return an error describing the first structural fault found.
pub fn decode(input: &[u8]) -> Result<Document, Error> {
    Decoder::new(input).decode()
}

/// It checks the structure of a BSON buffer without keeping the document.
#[must_use]
pub fn validate(input: &[u8]) -> ValidationResult {
    match decode(input) {
        Ok(_) => ValidationResult::valid(),
        Err(err) => ValidationResult::from(&err),
    }
}

struct Decoder<'a> {
    input: &'a [u8],
    reader: ByteReader<'a>,
    /// Keys from the root to the element being parsed.
    path: Vec<String>,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            reader: ByteReader::new(input),
            path: Vec::new(),
        }
    }

    fn decode(&mut self) -> Result<Document, Error> {
        if self.input.len() < LENGTH_PREFIX_LEN {
            return Err(self.error(
                ErrorKind::InputTooShort {
                    available: self.input.len(),
                },
                0,
                None,
            ));
        }

        let document = self.document(ElementType::EmbeddedDocument, 0)?;

        let extra = self.reader.remaining();
        if extra > 0 {
            return Err(self.error(
                ErrorKind::TrailingBytes { extra },
                self.reader.position(),
                None,
            ));
        }

        debug!(
            elements = document.len(),
            bytes = self.input.len(),
            "decoded BSON document"
        );

        Ok(document)
    }

    fn document(&mut self, element_type: ElementType, depth: usize) -> Result<Document, Error> {
        Ok(self.elements(element_type, depth)?.into_iter().collect())
    }

    fn array(&mut self, depth: usize) -> Result<Vec<Bson>, Error> {
        Ok(self
            .elements(ElementType::Array, depth)?
            .into_iter()
            .map(|(_, value)| value)
            .collect())
    }

    /// It reads a length prefixed list of elements ending with a null byte.
    fn elements(
        &mut self,
        element_type: ElementType,
        depth: usize,
    ) -> Result<Vec<(String, Bson)>, Error> {
        let start = self.reader.position();

        if depth > MAX_NESTING_DEPTH {
            return Err(self.error(
                ErrorKind::MaxNestingDepthExceeded {
                    max: MAX_NESTING_DEPTH,
                },
                start,
                None,
            ));
        }

        let declared = self
            .reader
            .read_i32_le()
            .ok_or_else(|| self.truncated(element_type, start))?;

        if declared < MIN_DOCUMENT_LEN {
            return Err(self.error(ErrorKind::InvalidDocumentLength { declared }, start, None));
        }

        let available = self.input.len() - start;
        let len = usize::try_from(declared).unwrap_or(usize::MAX);
        if len > available {
            return Err(self.error(
                ErrorKind::DeclaredLengthExceedsInput {
                    declared,
                    available,
                },
                start,
                None,
            ));
        }

        let terminator_pos = start + len - 1;
        let mut elements = Vec::new();

        loop {
            let pos = self.reader.position();

            if pos == terminator_pos {
                let byte = self.reader.read_byte();
                if byte != Some(0) {
                    return Err(self.error(ErrorKind::MissingDocumentTerminator, pos, byte));
                }
                break;
            }

            let Some(tag) = self.reader.read_byte() else {
                return Err(self.truncated(element_type, pos));
            };

            if tag == 0 {
                return Err(self.error(
                    ErrorKind::DocumentLengthMismatch {
                        declared,
                        consumed: pos + 1 - start,
                    },
                    pos,
                    Some(tag),
                ));
            }

            let Some(value_type) = ElementType::from_tag(tag) else {
                let key = self.lookahead_key(pos + 1);
                return Err(self.error_with_key(
                    ErrorKind::UnrecognizedElementType,
                    pos,
                    Some(tag),
                    key,
                ));
            };

            let key = self.key()?;

            self.path.push(key);
            let value = self.value(value_type, depth)?;

            let after = self.reader.position();
            if after > terminator_pos {
                return Err(self.error(
                    ErrorKind::DocumentLengthMismatch {
                        declared,
                        consumed: after + 1 - start,
                    },
                    terminator_pos,
                    None,
                ));
            }

            let key = self.path.pop().unwrap_or_default();
            elements.push((key, value));
        }

        Ok(elements)
    }

    fn key(&mut self) -> Result<String, Error> {
        let pos = self.reader.position();

        let bytes = self
            .reader
            .read_until_null()
            .ok_or_else(|| self.error(ErrorKind::UnterminatedKey, pos, None))?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| self.error(ErrorKind::InvalidUtf8Key, pos, None))
    }

    fn value(&mut self, element_type: ElementType, depth: usize) -> Result<Bson, Error> {
        let pos = self.reader.position();

        let value = match element_type {
            ElementType::Double => Bson::Double(
                self.reader
                    .read_f64_le()
                    .ok_or_else(|| self.truncated(element_type, pos))?,
            ),
            ElementType::String => Bson::String(self.string(element_type)?),
            ElementType::EmbeddedDocument => Bson::Document(self.document(element_type, depth + 1)?),
            ElementType::Array => Bson::Array(self.array(depth + 1)?),
            ElementType::Binary => Bson::Binary(self.binary()?),
            ElementType::Undefined => Bson::Undefined,
            ElementType::ObjectId => Bson::ObjectId(self.object_id(element_type)?),
            ElementType::Boolean => Bson::Boolean(self.boolean()?),
            ElementType::DateTime => Bson::DateTime(
                self.reader
                    .read_i64_le()
                    .ok_or_else(|| self.truncated(element_type, pos))?,
            ),
            ElementType::Null => Bson::Null,
            ElementType::RegularExpression => Bson::RegularExpression(Regex {
                pattern: self.cstring(element_type)?,
                options: self.cstring(element_type)?,
            }),
            ElementType::DbPointer => Bson::DbPointer(DbPointer {
                namespace: self.string(element_type)?,
                id: self.object_id(element_type)?,
            }),
            ElementType::JavaScriptCode => Bson::JavaScriptCode(self.string(element_type)?),
            ElementType::Symbol => Bson::Symbol(self.string(element_type)?),
            ElementType::JavaScriptCodeWithScope => {
                Bson::JavaScriptCodeWithScope(self.code_with_scope(depth)?)
            }
            ElementType::Int32 => Bson::Int32(
                self.reader
                    .read_i32_le()
                    .ok_or_else(|| self.truncated(element_type, pos))?,
            ),
            ElementType::Timestamp => Bson::Timestamp(Timestamp::from_u64(
                self.reader
                    .read_u64_le()
                    .ok_or_else(|| self.truncated(element_type, pos))?,
            )),
            ElementType::Int64 => Bson::Int64(
                self.reader
                    .read_i64_le()
                    .ok_or_else(|| self.truncated(element_type, pos))?,
            ),
            ElementType::Decimal128 => Bson::Decimal128(Decimal128::from_bytes(
                self.reader
                    .read_array()
                    .ok_or_else(|| self.truncated(element_type, pos))?,
            )),
            ElementType::MinKey => Bson::MinKey,
            ElementType::MaxKey => Bson::MaxKey,
        };

        Ok(value)
    }

    /// Length prefixed UTF-8 string: `i32 length + bytes + 0x00`. The length
    /// includes the terminator.
    fn string(&mut self, element_type: ElementType) -> Result<String, Error> {
        let pos = self.reader.position();

        let declared = self
            .reader
            .read_i32_le()
            .ok_or_else(|| self.truncated(element_type, pos))?;

        let len = usize::try_from(declared)
            .ok()
            .filter(|len| *len >= 1)
            .ok_or_else(|| self.error(ErrorKind::InvalidStringLength { declared }, pos, None))?;

        let bytes = self
            .reader
            .read_bytes(len)
            .ok_or_else(|| self.truncated(element_type, pos))?;

        let (content, terminator) = (&bytes[..len - 1], bytes[len - 1]);
        if terminator != 0 {
            return Err(self.error(
                ErrorKind::StringNotNullTerminated,
                pos + LENGTH_PREFIX_LEN + len - 1,
                Some(terminator),
            ));
        }

        std::str::from_utf8(content)
            .map(str::to_owned)
            .map_err(|_| {
                self.error(
                    ErrorKind::InvalidUtf8(element_type),
                    pos + LENGTH_PREFIX_LEN,
                    None,
                )
            })
    }

    fn cstring(&mut self, element_type: ElementType) -> Result<String, Error> {
        let pos = self.reader.position();

        let bytes = self
            .reader
            .read_until_null()
            .ok_or_else(|| self.error(ErrorKind::UnterminatedCString(element_type), pos, None))?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| self.error(ErrorKind::InvalidUtf8(element_type), pos, None))
    }

    fn object_id(&mut self, element_type: ElementType) -> Result<ObjectId, Error> {
        let pos = self.reader.position();

        self.reader
            .read_array()
            .map(ObjectId::from_bytes)
            .ok_or_else(|| self.truncated(element_type, pos))
    }

    fn boolean(&mut self) -> Result<bool, Error> {
        let pos = self.reader.position();

        match self.reader.read_byte() {
            Some(0x00) => Ok(false),
            Some(0x01) => Ok(true),
            Some(byte) => Err(self.error(
                ErrorKind::InvalidBooleanByte { pos: pos as u64 },
                pos,
                Some(byte),
            )),
            None => Err(self.truncated(ElementType::Boolean, pos)),
        }
    }

    /// `i32 length + subtype + bytes`. The old binary subtype wraps the
    /// bytes in a second length prefix which is checked and removed.
    fn binary(&mut self) -> Result<Binary, Error> {
        let pos = self.reader.position();

        let declared = self
            .reader
            .read_i32_le()
            .ok_or_else(|| self.truncated(ElementType::Binary, pos))?;

        let len = usize::try_from(declared)
            .map_err(|_| self.error(ErrorKind::InvalidBinaryLength { declared }, pos, None))?;

        let subtype = self
            .reader
            .read_byte()
            .ok_or_else(|| self.truncated(ElementType::Binary, pos))?;

        let bytes = self
            .reader
            .read_bytes(len)
            .ok_or_else(|| self.truncated(ElementType::Binary, pos))?;

        if subtype != Binary::SUBTYPE_BINARY_OLD {
            return Ok(Binary {
                subtype,
                bytes: bytes.to_vec(),
            });
        }

        let payload_pos = pos + LENGTH_PREFIX_LEN + 1;

        if len < LENGTH_PREFIX_LEN {
            return Err(self.error(ErrorKind::InvalidBinaryLength { declared }, pos, None));
        }

        let (inner, payload) = bytes.split_at(LENGTH_PREFIX_LEN);
        let inner = i32::from_le_bytes([inner[0], inner[1], inner[2], inner[3]]);

        if usize::try_from(inner).ok() != Some(payload.len()) {
            return Err(self.error(
                ErrorKind::InvalidOldBinaryLength {
                    inner,
                    expected: payload.len(),
                },
                payload_pos,
                None,
            ));
        }

        Ok(Binary {
            subtype,
            bytes: payload.to_vec(),
        })
    }

    /// `i32 total length + string + document`.
    fn code_with_scope(&mut self, depth: usize) -> Result<JavaScriptCodeWithScope, Error> {
        let element_type = ElementType::JavaScriptCodeWithScope;
        let pos = self.reader.position();

        let declared = self
            .reader
            .read_i32_le()
            .ok_or_else(|| self.truncated(element_type, pos))?;

        let code = self.string(element_type)?;
        let scope = self.document(element_type, depth + 1)?;

        let consumed = self.reader.position() - pos;
        if usize::try_from(declared).ok() != Some(consumed) {
            return Err(self.error(
                ErrorKind::CodeWithScopeLengthMismatch { declared, consumed },
                pos,
                None,
            ));
        }

        Ok(JavaScriptCodeWithScope { code, scope })
    }

    /// Reads the key after an element tag without consuming it, only to
    /// enrich error reports.
    fn lookahead_key(&self, pos: usize) -> Option<String> {
        let rest = self.input.get(pos..)?;
        let len = rest.iter().position(|byte| *byte == 0)?;
        std::str::from_utf8(&rest[..len]).ok().map(str::to_owned)
    }

    fn truncated(&self, element_type: ElementType, pos: usize) -> Error {
        self.error(ErrorKind::UnexpectedEndOfInput(element_type), pos, None)
    }

    fn error(&self, kind: ErrorKind, pos: usize, byte: Option<u8>) -> Error {
        self.error_with_key(kind, pos, byte, None)
    }

    fn error_with_key(
        &self,
        kind: ErrorKind,
        pos: usize,
        byte: Option<u8>,
        key: Option<String>,
    ) -> Error {
        let mut path = self.path.clone();
        path.extend(key);

        Error {
            kind,
            context: ReadContext {
                byte,
                pos: pos as u64,
                key: if path.is_empty() {
                    None
                } else {
                    Some(path.join("."))
                },
                latest_bytes: self.reader.captured_bytes_before(pos),
            },
        }
    }
}

#[cfg(test)]
mod tests {

    mod it_should_decode {
        use crate::{
            bson::{Binary, Bson, Decimal128, ObjectId, Regex, Timestamp},
            decoder::decode,
            test::{string_payload, DocumentBuilder, SAMPLE_OBJECT_ID},
        };

        #[test]
        fn an_empty_document() {
            let document = decode(b"\x05\x00\x00\x00\x00").unwrap();

            assert!(document.is_empty());
        }

        #[test]
        fn elements_preserving_the_key_order() {
            let input = DocumentBuilder::new()
                .int32("b", 1)
                .string("a", "two")
                .array("c", &DocumentBuilder::new().int32("0", 1).int32("1", 2))
                .build();

            let document = decode(&input).unwrap();

            assert_eq!(document.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
            assert_eq!(document.get("b"), Some(&Bson::Int32(1)));
            assert_eq!(document.get("a"), Some(&Bson::String("two".to_string())));
            assert_eq!(
                document.get("c"),
                Some(&Bson::Array(vec![Bson::Int32(1), Bson::Int32(2)]))
            );
        }

        #[test]
        fn every_fixed_size_type() {
            let input = DocumentBuilder::new()
                .double("double", 1.5)
                .object_id("oid", SAMPLE_OBJECT_ID)
                .boolean("yes", true)
                .boolean("no", false)
                .datetime("date", 1_700_000_000_000)
                .null("null")
                .timestamp("ts", 1_700_000_000, 3)
                .int64("long", -5)
                .element(0x13, "decimal", &[0x01; 16])
                .element(0x06, "undefined", &[])
                .element(0xFF, "min", &[])
                .element(0x7F, "max", &[])
                .build();

            let document = decode(&input).unwrap();

            let values: Vec<&Bson> = document.values().collect();
            assert_eq!(
                values,
                vec![
                    &Bson::Double(1.5),
                    &Bson::ObjectId(ObjectId::from_bytes(SAMPLE_OBJECT_ID)),
                    &Bson::Boolean(true),
                    &Bson::Boolean(false),
                    &Bson::DateTime(1_700_000_000_000),
                    &Bson::Null,
                    &Bson::Timestamp(Timestamp {
                        time: 1_700_000_000,
                        increment: 3
                    }),
                    &Bson::Int64(-5),
                    &Bson::Decimal128(Decimal128::from_bytes([0x01; 16])),
                    &Bson::Undefined,
                    &Bson::MinKey,
                    &Bson::MaxKey,
                ]
            );
        }

        #[test]
        fn strings_with_the_full_unicode_range() {
            let input = DocumentBuilder::new().string("s", "ñandú \u{1F600}").build();

            let document = decode(&input).unwrap();

            assert_eq!(
                document.get("s"),
                Some(&Bson::String("ñandú \u{1F600}".to_string()))
            );
        }

        #[test]
        fn nested_documents() {
            let input = DocumentBuilder::new()
                .document("outer", &DocumentBuilder::new().int32("inner", 7))
                .build();

            let document = decode(&input).unwrap();

            let Some(Bson::Document(outer)) = document.get("outer") else {
                panic!("expected an embedded document");
            };
            assert_eq!(outer.get("inner"), Some(&Bson::Int32(7)));
        }

        #[test]
        fn arrays_without_checking_their_keys() {
            let input = DocumentBuilder::new()
                .array("a", &DocumentBuilder::new().int32("x", 1).int32("x", 2))
                .build();

            let document = decode(&input).unwrap();

            assert_eq!(
                document.get("a"),
                Some(&Bson::Array(vec![Bson::Int32(1), Bson::Int32(2)]))
            );
        }

        #[test]
        fn regular_expressions() {
            let input = DocumentBuilder::new().regex("re", "^a.*", "mi").build();

            let document = decode(&input).unwrap();

            assert_eq!(
                document.get("re"),
                Some(&Bson::RegularExpression(Regex {
                    pattern: "^a.*".to_string(),
                    options: "mi".to_string()
                }))
            );
        }

        #[test]
        fn binary_data() {
            let input = DocumentBuilder::new().binary("bin", 0x00, b"abc").build();

            let document = decode(&input).unwrap();

            assert_eq!(
                document.get("bin"),
                Some(&Bson::Binary(Binary {
                    subtype: 0x00,
                    bytes: b"abc".to_vec()
                }))
            );
        }

        #[test]
        fn old_binary_data_removing_the_inner_length() {
            let input = DocumentBuilder::new()
                .binary("bin", 0x02, b"\x03\x00\x00\x00abc")
                .build();

            let document = decode(&input).unwrap();

            assert_eq!(
                document.get("bin"),
                Some(&Bson::Binary(Binary {
                    subtype: 0x02,
                    bytes: b"abc".to_vec()
                }))
            );
        }

        #[test]
        fn deprecated_string_like_types() {
            let mut db_pointer = string_payload("db.coll");
            db_pointer.extend_from_slice(&SAMPLE_OBJECT_ID);

            let input = DocumentBuilder::new()
                .element(0x0C, "ptr", &db_pointer)
                .element(0x0D, "code", &string_payload("x = 1"))
                .element(0x0E, "sym", &string_payload("s"))
                .build();

            let document = decode(&input).unwrap();

            assert!(matches!(document.get("ptr"), Some(Bson::DbPointer(pointer)) if pointer.namespace == "db.coll"));
            assert_eq!(
                document.get("code"),
                Some(&Bson::JavaScriptCode("x = 1".to_string()))
            );
            assert_eq!(document.get("sym"), Some(&Bson::Symbol("s".to_string())));
        }

        #[test]
        fn code_with_scope() {
            let code = string_payload("return x;");
            let scope = DocumentBuilder::new().int32("x", 1).build();
            let total = i32::try_from(4 + code.len() + scope.len()).unwrap();

            let mut payload = total.to_le_bytes().to_vec();
            payload.extend_from_slice(&code);
            payload.extend_from_slice(&scope);

            let input = DocumentBuilder::new().element(0x0F, "fn", &payload).build();

            let document = decode(&input).unwrap();

            let Some(Bson::JavaScriptCodeWithScope(code_with_scope)) = document.get("fn") else {
                panic!("expected code with scope");
            };
            assert_eq!(code_with_scope.code, "return x;");
            assert_eq!(code_with_scope.scope.get("x"), Some(&Bson::Int32(1)));
        }

        #[test]
        fn duplicate_keys_as_they_come() {
            let input = DocumentBuilder::new().int32("a", 1).int32("a", 2).build();

            let document = decode(&input).unwrap();

            assert_eq!(document.len(), 2);
        }
    }

    mod it_should_fail {
        use crate::{
            bson::ElementType,
            decoder::{decode, error::ErrorKind, MAX_NESTING_DEPTH},
            test::{generate_n_nested_documents, string_payload, DocumentBuilder},
        };

        #[test]
        fn when_the_input_is_shorter_than_the_length_prefix() {
            for input in [
                &b""[..],
                &b"\x05"[..],
                &b"\x05\x00"[..],
                &b"\x05\x00\x00"[..],
            ] {
                let err = decode(input).unwrap_err();

                assert_eq!(
                    err.kind,
                    ErrorKind::InputTooShort {
                        available: input.len()
                    }
                );
                assert!(err.position() <= input.len() as u64);
            }
        }

        #[test]
        fn when_the_declared_length_exceeds_the_input() {
            let err = decode(b"\x10\x00\x00\x00\x00").unwrap_err();

            assert_eq!(
                err.kind,
                ErrorKind::DeclaredLengthExceedsInput {
                    declared: 16,
                    available: 5
                }
            );
            assert_eq!(err.position(), 0);
        }

        #[test]
        fn when_the_declared_length_is_below_the_minimum() {
            let err = decode(b"\x04\x00\x00\x00\x00").unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidDocumentLength { declared: 4 });
        }

        #[test]
        fn when_the_declared_length_is_negative() {
            let err = decode(b"\xFF\xFF\xFF\xFF\x00").unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidDocumentLength { declared: -1 });
        }

        #[test]
        fn for_every_truncation_of_a_valid_document_without_reading_out_of_bounds() {
            let input = DocumentBuilder::new()
                .string("s", "value")
                .document("d", &DocumentBuilder::new().double("x", 2.0))
                .binary("b", 0x00, b"bytes")
                .build();

            for len in 0..input.len() {
                let truncated = &input[..len];

                let err = decode(truncated).unwrap_err();

                assert!(
                    err.position() <= len as u64,
                    "position {} beyond input length {len}",
                    err.position()
                );
            }
        }

        #[test]
        fn when_a_truncated_buffer_is_patched_with_a_matching_length_prefix() {
            // `{"n": int32}` with the last two payload bytes and the
            // terminator cut, and the prefix fixed up to the new length.
            let mut input = DocumentBuilder::new().int32("n", 1).build();
            input.truncate(input.len() - 3);
            let len = i32::try_from(input.len()).unwrap();
            input[..4].copy_from_slice(&len.to_le_bytes());

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput(ElementType::Int32));
            assert_eq!(err.position(), 7);
            assert_eq!(err.key(), Some("n"));
        }

        #[test]
        fn when_a_boolean_byte_is_not_zero_or_one() {
            let input = DocumentBuilder::new().element(0x08, "b", &[0x02]).build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidBooleanByte { pos: 7 });
            assert_eq!(err.position(), 7);
            assert_eq!(err.key(), Some("b"));
            assert!(err.reason().contains("position 7"));
        }

        #[test]
        fn when_the_element_type_is_not_recognized() {
            let input = DocumentBuilder::new().element(0x14, "x", &[]).build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::UnrecognizedElementType);
            assert_eq!(err.position(), 4);
            assert_eq!(err.context.byte, Some(0x14));
            assert_eq!(err.key(), Some("x"));
        }

        #[test]
        fn reporting_the_full_key_path_for_nested_faults() {
            let input = DocumentBuilder::new()
                .document(
                    "outer",
                    &DocumentBuilder::new().element(0x08, "flag", &[0x05]),
                )
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.key(), Some("outer.flag"));
        }

        #[test]
        fn when_the_length_prefix_is_larger_than_the_elements() {
            let mut input = DocumentBuilder::new().int32("n", 1).build();
            input.push(0);
            let len = i32::try_from(input.len()).unwrap();
            input[..4].copy_from_slice(&len.to_le_bytes());

            let err = decode(&input).unwrap_err();

            assert_eq!(
                err.kind,
                ErrorKind::DocumentLengthMismatch {
                    declared: len,
                    consumed: input.len() - 1
                }
            );
        }

        #[test]
        fn when_an_element_runs_past_the_declared_end_of_its_document() {
            // The nested document declares 5 bytes but holds an int32.
            let mut nested = DocumentBuilder::new().int32("n", 1).build();
            nested[..4].copy_from_slice(&5i32.to_le_bytes());

            let input = DocumentBuilder::new().element(0x03, "d", &nested).build();

            let err = decode(&input).unwrap_err();

            assert!(matches!(
                err.kind,
                ErrorKind::MissingDocumentTerminator | ErrorKind::DocumentLengthMismatch { .. }
            ));
        }

        #[test]
        fn when_the_document_terminator_is_missing() {
            let mut input = DocumentBuilder::new().build();
            input[4] = 0x01;

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::MissingDocumentTerminator);
            assert_eq!(err.position(), 4);
        }

        #[test]
        fn when_there_are_trailing_bytes_after_the_document() {
            let mut input = DocumentBuilder::new().build();
            input.extend_from_slice(b"\x00\x00");

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::TrailingBytes { extra: 2 });
            assert_eq!(err.position(), 5);
        }

        #[test]
        fn when_a_string_length_does_not_include_the_terminator() {
            let input = DocumentBuilder::new()
                .element(0x02, "s", b"\x00\x00\x00\x00")
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidStringLength { declared: 0 });
        }

        #[test]
        fn when_a_string_is_not_null_terminated_at_the_declared_length() {
            let input = DocumentBuilder::new()
                .element(0x02, "s", b"\x02\x00\x00\x00ab")
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::StringNotNullTerminated);
            assert_eq!(err.context.byte, Some(b'b'));
        }

        #[test]
        fn when_a_string_is_not_valid_utf8() {
            let input = DocumentBuilder::new()
                .element(0x02, "s", b"\x02\x00\x00\x00\xFF\x00")
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidUtf8(ElementType::String));
        }

        #[test]
        fn when_a_key_is_not_valid_utf8() {
            // `{"": null}` with an invalid UTF-8 byte inserted in the key.
            let mut input = DocumentBuilder::new().null("").build();
            input.insert(5, 0xFF);
            let len = i32::try_from(input.len()).unwrap();
            input[..4].copy_from_slice(&len.to_le_bytes());

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidUtf8Key);
            assert_eq!(err.position(), 5);
        }

        #[test]
        fn when_a_binary_length_is_negative() {
            let input = DocumentBuilder::new()
                .element(0x05, "b", b"\xFF\xFF\xFF\xFF\x00")
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidBinaryLength { declared: -1 });
        }

        #[test]
        fn when_an_old_binary_inner_length_does_not_match() {
            let input = DocumentBuilder::new()
                .binary("b", 0x02, b"\x09\x00\x00\x00abc")
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(
                err.kind,
                ErrorKind::InvalidOldBinaryLength {
                    inner: 9,
                    expected: 3
                }
            );
        }

        #[test]
        fn when_the_code_with_scope_length_does_not_match() {
            let code = string_payload("f()");
            let scope = DocumentBuilder::new().build();

            let mut payload = 99i32.to_le_bytes().to_vec();
            payload.extend_from_slice(&code);
            payload.extend_from_slice(&scope);

            let input = DocumentBuilder::new().element(0x0F, "fn", &payload).build();

            let err = decode(&input).unwrap_err();

            assert_eq!(
                err.kind,
                ErrorKind::CodeWithScopeLengthMismatch {
                    declared: 99,
                    consumed: 4 + code.len() + scope.len()
                }
            );
        }

        #[test]
        fn when_a_regex_pattern_is_unterminated() {
            let mut input = DocumentBuilder::new().element(0x0B, "re", b"abc").build();
            // Drop the document terminator so no null byte follows the pattern.
            input.pop();
            let len = i32::try_from(input.len()).unwrap();
            input[..4].copy_from_slice(&len.to_le_bytes());

            let err = decode(&input).unwrap_err();

            assert_eq!(
                err.kind,
                ErrorKind::UnterminatedCString(ElementType::RegularExpression)
            );
            // Length prefix, tag and `re\0` come before the pattern.
            assert_eq!(err.position(), 8);
        }

        #[test]
        fn when_regex_options_are_not_valid_utf8() {
            let input = DocumentBuilder::new()
                .element(0x0B, "r", b"a\x00\xFF\x00")
                .build();

            let err = decode(&input).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidUtf8(ElementType::RegularExpression));
            // The options start right after the `a\0` pattern.
            assert_eq!(err.position(), 9);
        }

        #[test]
        fn when_documents_are_nested_too_deep() {
            assert!(decode(&generate_n_nested_documents(MAX_NESTING_DEPTH)).is_ok());

            let err = decode(&generate_n_nested_documents(MAX_NESTING_DEPTH + 1)).unwrap_err();

            assert_eq!(
                err.kind,
                ErrorKind::MaxNestingDepthExceeded {
                    max: MAX_NESTING_DEPTH
                }
            );
        }
    }

    mod it_should_validate {
        use crate::{decoder::validate, test::DocumentBuilder};

        #[test]
        fn a_well_formed_document() {
            let input = DocumentBuilder::new().int32("a", 1).build();

            let result = validate(&input);

            assert!(result.is_valid);
            assert_eq!(result.error_position, None);
        }

        #[test]
        fn a_malformed_document_reporting_position_key_and_reason() {
            let input = DocumentBuilder::new().element(0x08, "flag", &[0x07]).build();

            let result = validate(&input);

            assert!(!result.is_valid);
            assert_eq!(result.error_position, Some(10));
            assert_eq!(result.key.as_deref(), Some("flag"));
            assert_eq!(
                result.reason.as_deref(),
                Some("Invalid boolean byte at position 10, expected 0x00 or 0x01")
            );
        }
    }
}
