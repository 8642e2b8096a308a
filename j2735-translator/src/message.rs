//! Upstream boundary: decoded elements as delivered by the ASN.1 codec
//!
//! The translator only needs named accessors returning either an integer or a
//! byte sequence. `FieldSource` captures that; `RawElement` is the owned form
//! used when messages arrive serialized (e.g., as JSON lines).

use crate::types::{RawField, Timestamp};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named access to the binary fields of one decoded element
pub trait FieldSource {
    /// Raw value of a field, `None` if the element does not carry it
    fn field(&self, name: &str) -> Option<&RawField>;
}

impl FieldSource for BTreeMap<String, RawField> {
    fn field(&self, name: &str) -> Option<&RawField> {
        self.get(name)
    }
}

impl FieldSource for [(&str, RawField)] {
    fn field(&self, name: &str) -> Option<&RawField> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

impl<const N: usize> FieldSource for [(&str, RawField); N] {
    fn field(&self, name: &str) -> Option<&RawField> {
        self.as_slice().field(name)
    }
}

/// One decoded message element with its type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    /// Element type name (e.g., "BrakeSystemStatus")
    pub element_type: String,
    /// Generation time in nanoseconds since epoch, if the upstream knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ns: Option<u64>,
    /// Binary fields keyed by ASN.1 component name
    #[serde(default)]
    pub fields: BTreeMap<String, RawField>,
}

impl RawElement {
    /// Create an element with no fields
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            timestamp_ns: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder method: add an integer field
    pub fn with_integer(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), RawField::Integer(value));
        self
    }

    /// Builder method: add a bit string field
    pub fn with_bytes(mut self, name: impl Into<String>, value: &[u8]) -> Self {
        self.fields.insert(name.into(), RawField::Bytes(value.to_vec()));
        self
    }

    /// Builder method: set the generation timestamp
    pub fn with_timestamp_ns(mut self, timestamp_ns: u64) -> Self {
        self.timestamp_ns = Some(timestamp_ns);
        self
    }

    /// Convert the nanosecond timestamp to DateTime<Utc>
    pub fn timestamp(&self) -> Option<Timestamp> {
        let ns = self.timestamp_ns?;
        let secs = (ns / 1_000_000_000) as i64;
        let nsecs = (ns % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nsecs)
    }
}

impl FieldSource for RawElement {
    fn field(&self, name: &str) -> Option<&RawField> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let element = RawElement::new("WiperSet")
            .with_integer("statusFront", 2)
            .with_bytes("mask", &[0x80]);

        assert_eq!(element.field("statusFront"), Some(&RawField::Integer(2)));
        assert_eq!(element.field("mask"), Some(&RawField::Bytes(vec![0x80])));
        assert_eq!(element.field("statusRear"), None);
    }

    #[test]
    fn test_deserialize_json_line() {
        let line = r#"{"elementType":"BrakeSystemStatus","timestampNs":1500000000000000000,
            "fields":{"wheelBrakes":[64],"traction":3}}"#;
        let element: RawElement = serde_json::from_str(line).unwrap();

        assert_eq!(element.element_type, "BrakeSystemStatus");
        assert_eq!(element.field("wheelBrakes"), Some(&RawField::Bytes(vec![0x40])));
        assert_eq!(element.field("traction"), Some(&RawField::Integer(3)));
        assert_eq!(element.timestamp().unwrap().timestamp(), 1_500_000_000);
    }

    #[test]
    fn test_missing_timestamp() {
        let element: RawElement =
            serde_json::from_str(r#"{"elementType":"GnssStatus"}"#).unwrap();
        assert!(element.timestamp().is_none());
        assert!(element.fields.is_empty());
    }

    #[test]
    fn test_slice_source() {
        let source = [("traction", RawField::Integer(1))];
        assert_eq!(source.field("traction"), Some(&RawField::Integer(1)));
        assert_eq!(source.field("abs"), None);
    }
}
