//! Core types for the J2735 translation layer
//!
//! This module defines the raw values the translator consumes from the upstream
//! ASN.1 codec, the decoded values it produces, and the error taxonomy. The
//! translator is stateless: every record is created fresh from one raw element
//! and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registry::ElementType;

/// Timestamp type used for upstream message metadata
pub type Timestamp = DateTime<Utc>;

/// Result type for record-level translation
pub type Result<T> = std::result::Result<T, TranslateError>;

/// A single binary field as handed over by the upstream ASN.1 codec
///
/// Bit strings arrive as their padded octets, restricted integer enumerations
/// as plain integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// Enumeration or passthrough integer
    Integer(i64),
    /// Packed bit string, padded to whole bytes
    Bytes(Vec<u8>),
    /// Any other JSON value; rejected per field by the composer
    Other(serde_json::Value),
}

impl RawField {
    /// Short name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            RawField::Integer(_) => "integer",
            RawField::Bytes(_) => "bytes",
            RawField::Other(value) => match value {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "boolean",
                serde_json::Value::Number(_) => "number",
                serde_json::Value::String(_) => "string",
                serde_json::Value::Array(_) => "array",
                serde_json::Value::Object(_) => "object",
            },
        }
    }

    /// True for an explicit JSON `null`, which counts as an absent field
    pub fn is_null(&self) -> bool {
        matches!(self, RawField::Other(serde_json::Value::Null))
    }
}

/// Field-level decode errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unknown code {code} for {table} (valid codes 0..{size})")]
    UnknownCode {
        table: &'static str,
        code: i64,
        size: usize,
    },

    #[error("Bit width mismatch for {map}: expected {expected} bits, got {actual} bits")]
    BitWidthMismatch {
        map: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Field '{0}' is missing from the decoded element")]
    MissingField(&'static str),

    #[error("Field '{field}' has unexpected kind: expected {expected}, got {actual}")]
    UnexpectedKind {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A decode failure attributed to one field of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Declared field name
    pub field: &'static str,
    /// Whether the field is required for record validity
    pub required: bool,
    /// Underlying decode error
    pub error: DecodeError,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Record-level failure: at least one required field could not be decoded
///
/// Carries every field failure of the record and the fields that did decode,
/// so that one malformed field does not hide the state of its siblings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Failed to compose {element}: {}", join_failures(.failures))]
pub struct CompositionError {
    pub element: ElementType,
    pub failures: Vec<FieldFailure>,
    pub partial: Vec<(&'static str, FieldValue)>,
}

impl CompositionError {
    /// Look up a successfully decoded field in the partial result
    pub fn partial_field(&self, name: &str) -> Option<&FieldValue> {
        self.partial
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

fn join_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned when translating a whole element
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("Unsupported element type: {0}")]
    UnsupportedElement(String),

    #[error("Element type {0} is excluded by configuration")]
    Filtered(ElementType),
}

/// Named boolean flags decoded from one bit string
///
/// Entries keep the declaration order of the bit map so that serialized
/// output is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedFlagSet {
    flags: Vec<(&'static str, bool)>,
}

impl DecodedFlagSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            flags: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: bool) {
        self.flags.push((name, value));
    }

    /// Value of a flag, `None` if the map does not declare it
    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| *value)
    }

    /// True if the flag is declared and set
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    /// Iterate flags in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.flags.iter().copied()
    }

    /// Names of all flags that are set
    pub fn active(&self) -> Vec<&'static str> {
        self.iter().filter(|(_, v)| *v).map(|(n, _)| n).collect()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl Serialize for DecodedFlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len()))?;
        for (name, value) in &self.flags {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A decoded field value inside a status record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Flags decoded from a bit string
    Flags(DecodedFlagSet),
    /// Label from an enumeration table
    Label(&'static str),
    /// Integer passed through unchanged
    Integer(i64),
    /// Optional field that was not present (or could not be decoded)
    Absent,
}

impl FieldValue {
    pub fn as_label(&self) -> Option<&'static str> {
        match self {
            FieldValue::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_flags(&self) -> Option<&DecodedFlagSet> {
        match self {
            FieldValue::Flags(flags) => Some(flags),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flags(flags) => write!(f, "[{}]", flags.active().join(", ")),
            FieldValue::Label(label) => write!(f, "{}", label),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Absent => write!(f, "-"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Flags(flags) => flags.serialize(serializer),
            FieldValue::Label(label) => serializer.serialize_str(label),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Absent => serializer.serialize_none(),
        }
    }
}

/// The composed, labeled output for one vehicle subsystem
///
/// Serializes to a JSON object keyed by the declared field names in
/// declaration order. Issues from optional fields are kept for diagnostics
/// but are not part of the serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    element: ElementType,
    fields: Vec<(&'static str, FieldValue)>,
    issues: Vec<FieldFailure>,
}

impl StatusRecord {
    pub(crate) fn new(
        element: ElementType,
        fields: Vec<(&'static str, FieldValue)>,
        issues: Vec<FieldFailure>,
    ) -> Self {
        Self {
            element,
            fields,
            issues,
        }
    }

    /// Element type this record was translated from
    pub fn element(&self) -> ElementType {
        self.element
    }

    /// Look up a field by its declared name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Label of an enumeration field
    pub fn label(&self, name: &str) -> Option<&'static str> {
        self.field(name).and_then(FieldValue::as_label)
    }

    /// Flags of a bit string field
    pub fn flags(&self, name: &str) -> Option<&DecodedFlagSet> {
        self.field(name).and_then(FieldValue::as_flags)
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    /// Failures of optional fields that were tolerated
    pub fn issues(&self) -> &[FieldFailure] {
        &self.issues
    }

    /// Serialize the record to its downstream JSON form
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for StatusRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
