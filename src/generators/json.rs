//! Pretty JSON generator for mapped BSON documents.
//!
//! It writes a mapped [`Node`] tree with two-space indentation, one key or
//! array element per line, keeping object members in tree order. Repeated
//! keys are written once per occurrence.
use std::{fmt::Write as FmtWrite, io::Write as IoWrite};

use serde_json::Value;

use crate::mapper::Node;
use crate::rw::{
    byte_writer::ByteWriter, error::Error, string_writer::StringWriter, writer::Writer,
};

pub struct Generator<'a> {
    node: &'a Node,
}

impl<'a> Generator<'a> {
    const JSON_ARRAY_BEGIN: u8 = b'[';
    const JSON_ARRAY_ITEMS_SEPARATOR: u8 = b',';
    const JSON_ARRAY_END: u8 = b']';

    const JSON_OBJ_BEGIN: u8 = b'{';
    const JSON_OBJ_FIELDS_SEPARATOR: u8 = b',';
    const JSON_OBJ_FIELD_KEY_VALUE_SEPARATOR: &'static str = ": ";
    const JSON_OBJ_END: u8 = b'}';

    const LINE_BREAK: u8 = b'\n';
    const INDENT: &'static str = "  ";

    #[must_use]
    pub fn new(node: &'a Node) -> Self {
        Generator { node }
    }

    /// It writes the JSON text to any type implementing `fmt::Write`.
    ///
    /// # Errors
    ///
    /// Will return an error if it can't write to the output.
    pub fn write_str<W: FmtWrite>(&self, writer: W) -> Result<(), Error> {
        let mut writer = StringWriter::new(writer);
        self.generate(&mut writer)
    }

    /// It writes the JSON text as UTF-8 bytes to any type implementing
    /// `io::Write`.
    ///
    /// # Errors
    ///
    /// Will return an error if it can't write to the output.
    pub fn write_bytes<W: IoWrite>(&self, writer: W) -> Result<(), Error> {
        let mut writer = ByteWriter::new(writer);
        self.generate(&mut writer)
    }

    fn generate<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
        Self::write_node(self.node, 0, writer)?;
        writer.write_byte(Self::LINE_BREAK)?;
        writer.flush()
    }

    fn write_node<W: Writer>(node: &Node, depth: usize, writer: &mut W) -> Result<(), Error> {
        match node {
            Node::Value(value) => Self::write_value(value, depth, writer),
            Node::Array(items) => Self::write_array(items, depth, writer, Self::write_node),
            Node::Object(members) => Self::write_object(
                members.iter().map(|(key, node)| (key.as_str(), node)),
                depth,
                writer,
                Self::write_node,
            ),
        }
    }

    fn write_value<W: Writer>(value: &Value, depth: usize, writer: &mut W) -> Result<(), Error> {
        match value {
            Value::Null => writer.write_str("null"),
            Value::Bool(value) => writer.write_str(if *value { "true" } else { "false" }),
            Value::Number(number) => writer.write_str(&number.to_string()),
            Value::String(string) => Self::write_string(string, writer),
            Value::Array(items) => Self::write_array(items, depth, writer, Self::write_value),
            Value::Object(object) => Self::write_object(
                object.iter().map(|(key, value)| (key.as_str(), value)),
                depth,
                writer,
                Self::write_value,
            ),
        }
    }

    fn write_array<'v, T: 'v, W: Writer>(
        items: impl IntoIterator<Item = &'v T>,
        depth: usize,
        writer: &mut W,
        write_item: fn(&T, usize, &mut W) -> Result<(), Error>,
    ) -> Result<(), Error> {
        writer.write_byte(Self::JSON_ARRAY_BEGIN)?;

        let mut empty = true;

        for item in items {
            if !empty {
                writer.write_byte(Self::JSON_ARRAY_ITEMS_SEPARATOR)?;
            }
            empty = false;
            Self::write_new_line(depth + 1, writer)?;
            write_item(item, depth + 1, writer)?;
        }

        if !empty {
            Self::write_new_line(depth, writer)?;
        }
        writer.write_byte(Self::JSON_ARRAY_END)
    }

    fn write_object<'v, T: 'v, W: Writer>(
        members: impl IntoIterator<Item = (&'v str, &'v T)>,
        depth: usize,
        writer: &mut W,
        write_member: fn(&T, usize, &mut W) -> Result<(), Error>,
    ) -> Result<(), Error> {
        writer.write_byte(Self::JSON_OBJ_BEGIN)?;

        let mut empty = true;

        for (key, value) in members {
            if !empty {
                writer.write_byte(Self::JSON_OBJ_FIELDS_SEPARATOR)?;
            }
            empty = false;
            Self::write_new_line(depth + 1, writer)?;
            Self::write_string(key, writer)?;
            writer.write_str(Self::JSON_OBJ_FIELD_KEY_VALUE_SEPARATOR)?;
            write_member(value, depth + 1, writer)?;
        }

        if !empty {
            Self::write_new_line(depth, writer)?;
        }
        writer.write_byte(Self::JSON_OBJ_END)
    }

    fn write_string<W: Writer>(value: &str, writer: &mut W) -> Result<(), Error> {
        writer.write_str(&serde_json::to_string(value)?)
    }

    fn write_new_line<W: Writer>(depth: usize, writer: &mut W) -> Result<(), Error> {
        writer.write_byte(Self::LINE_BREAK)?;
        for _ in 0..depth {
            writer.write_str(Self::INDENT)?;
        }
        Ok(())
    }
}
