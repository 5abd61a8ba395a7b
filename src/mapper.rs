//! BSON to JSON value mapping.
//!
//! Decoded documents are mapped to a [`Node`] tree following MongoDB
//! Extended JSON v2. Types with a native JSON representation map to it;
//! the rest become single-key wrapper objects such as `{"$oid": "..."}`.
//!
//! Documents map to ordered key/value lists rather than `serde_json` maps,
//! so repeated keys are all kept in wire order.
//!
//! The mapping is total: every BSON value has a JSON representation, so
//! nothing here can fail.
use std::collections::HashSet;

use base64::Engine;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::{json, Number, Value};
use tracing::warn;

use crate::bson::{Binary, Bson, DbPointer, Document, JavaScriptCodeWithScope, Regex};

/// Years rendered as ISO-8601 strings in relaxed mode.
const RELAXED_DATE_YEARS: std::ops::RangeInclusive<i32> = 1970..=9999;

/// Extended JSON flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Native JSON numbers and ISO-8601 dates where they are lossless.
    #[default]
    Relaxed,
    /// Every number and date wrapped to keep its exact BSON type.
    Canonical,
}

/// A mapped JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar or an Extended JSON wrapper. Its object keys are unique.
    Value(Value),
    Array(Vec<Node>),
    /// Key/value pairs in document order. Keys may repeat.
    Object(Vec<(String, Node)>),
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Value(value)
    }
}

/// A node equals a `serde_json` value when both have the same members in
/// the same order. An object with repeated keys never equals a value.
impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Node::Value(value), other) => value == other,
            (Node::Array(items), Value::Array(others)) => {
                items.len() == others.len() && items.iter().zip(others).all(|(a, b)| a == b)
            }
            (Node::Object(members), Value::Object(others)) => {
                members.len() == others.len()
                    && members
                        .iter()
                        .zip(others)
                        .all(|((key, value), (other_key, other))| key == other_key && value == other)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper {
    mode: Mode,
}

impl Mapper {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Maps a whole document to a JSON object, keeping every key in order.
    #[must_use]
    pub fn to_json(&self, document: &Document) -> Node {
        self.document(document)
    }

    #[must_use]
    pub fn bson_to_json(&self, value: &Bson) -> Node {
        match value {
            Bson::Double(value) => self.double(*value).into(),
            Bson::String(value) => Value::String(value.clone()).into(),
            Bson::Document(document) => self.document(document),
            Bson::Array(items) => {
                Node::Array(items.iter().map(|item| self.bson_to_json(item)).collect())
            }
            Bson::Binary(binary) => binary_to_json(binary).into(),
            Bson::Undefined => json!({ "$undefined": true }).into(),
            Bson::ObjectId(oid) => json!({ "$oid": oid.to_hex() }).into(),
            Bson::Boolean(value) => Value::Bool(*value).into(),
            Bson::DateTime(millis) => self.datetime(*millis).into(),
            Bson::Null => Value::Null.into(),
            Bson::RegularExpression(regex) => regex_to_json(regex).into(),
            Bson::DbPointer(pointer) => db_pointer_to_json(pointer).into(),
            Bson::JavaScriptCode(code) => json!({ "$code": code }).into(),
            Bson::Symbol(symbol) => json!({ "$symbol": symbol }).into(),
            Bson::JavaScriptCodeWithScope(code_with_scope) => {
                self.code_with_scope(code_with_scope)
            }
            Bson::Int32(value) => match self.mode {
                Mode::Relaxed => Value::from(*value).into(),
                Mode::Canonical => json!({ "$numberInt": value.to_string() }).into(),
            },
            Bson::Timestamp(timestamp) => json!({
                "$timestamp": { "t": timestamp.time, "i": timestamp.increment }
            })
            .into(),
            Bson::Int64(value) => match self.mode {
                Mode::Relaxed => Value::from(*value).into(),
                Mode::Canonical => json!({ "$numberLong": value.to_string() }).into(),
            },
            Bson::Decimal128(decimal) => json!({ "$numberDecimal": decimal.to_string() }).into(),
            Bson::MinKey => json!({ "$minKey": 1 }).into(),
            Bson::MaxKey => json!({ "$maxKey": 1 }).into(),
        }
    }

    /// Repeated keys are kept as they are, each one at its own position.
    fn document(&self, document: &Document) -> Node {
        let mut seen = HashSet::with_capacity(document.len());
        let mut members = Vec::with_capacity(document.len());

        for (key, value) in document.iter() {
            if !seen.insert(key) {
                warn!(key, "duplicate key in document, keeping every occurrence");
            }
            members.push((key.to_owned(), self.bson_to_json(value)));
        }

        Node::Object(members)
    }

    fn double(&self, value: f64) -> Value {
        if !value.is_finite() {
            let special = if value.is_nan() {
                "NaN"
            } else if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            return json!({ "$numberDouble": special });
        }

        let Some(number) = Number::from_f64(value) else {
            return json!({ "$numberDouble": value.to_string() });
        };

        match self.mode {
            Mode::Relaxed => Value::Number(number),
            Mode::Canonical => json!({ "$numberDouble": number.to_string() }),
        }
    }

    fn datetime(&self, millis: i64) -> Value {
        if self.mode == Mode::Relaxed {
            if let Some(datetime) = DateTime::<Utc>::from_timestamp_millis(millis) {
                if RELAXED_DATE_YEARS.contains(&datetime.year()) {
                    return json!({
                        "$date": datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
                    });
                }
            }
        }

        json!({ "$date": { "$numberLong": millis.to_string() } })
    }

    fn code_with_scope(&self, code_with_scope: &JavaScriptCodeWithScope) -> Node {
        Node::Object(vec![
            (
                "$code".to_string(),
                Node::Value(Value::String(code_with_scope.code.clone())),
            ),
            ("$scope".to_string(), self.document(&code_with_scope.scope)),
        ])
    }
}

fn binary_to_json(binary: &Binary) -> Value {
    json!({
        "$binary": {
            "base64": base64::engine::general_purpose::STANDARD.encode(&binary.bytes),
            "subType": hex::encode([binary.subtype]),
        }
    })
}

/// Options are sorted alphabetically.
fn regex_to_json(regex: &Regex) -> Value {
    let mut options: Vec<char> = regex.options.chars().collect();
    options.sort_unstable();

    json!({
        "$regularExpression": {
            "pattern": regex.pattern,
            "options": options.into_iter().collect::<String>(),
        }
    })
}

fn db_pointer_to_json(pointer: &DbPointer) -> Value {
    json!({
        "$dbPointer": {
            "$ref": pointer.namespace,
            "$id": { "$oid": pointer.id.to_hex() },
        }
    })
}
