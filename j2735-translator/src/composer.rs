//! Status record composition
//!
//! Runs the per-field decoders of one element in declaration order and
//! assembles the results into a `StatusRecord`. A failing field never stops
//! its siblings from being decoded; whether it fails the record is decided by
//! the field's `required` flag and the failure policy.

use crate::bitfield::BitfieldDecoder;
use crate::config::FailurePolicy;
use crate::definitions::{DecodeStrategy, ElementDefinition, FieldSpec};
use crate::enum_mapper::EnumCodeMapper;
use crate::message::FieldSource;
use crate::types::{
    CompositionError, DecodeError, FieldFailure, FieldValue, RawField, Result, StatusRecord,
};

/// Status composer - builds records from element definitions
pub struct StatusComposer;

impl StatusComposer {
    /// Compose a record with the default failure policy
    pub fn compose<S>(definition: &'static ElementDefinition, source: &S) -> Result<StatusRecord>
    where
        S: FieldSource + ?Sized,
    {
        Self::compose_with(definition, source, FailurePolicy::default())
    }

    /// Compose a record from the fields of one decoded element
    ///
    /// # Arguments
    /// * `definition` - Ordered field list of the element type
    /// * `source` - Upstream accessors for the raw fields
    /// * `policy` - Which field failures fail the record
    ///
    /// # Returns
    /// * `Ok(StatusRecord)` with every declared field present
    /// * `Err(TranslateError::Composition)` with all field failures and the
    ///   fields that did decode
    pub fn compose_with<S>(
        definition: &'static ElementDefinition,
        source: &S,
        policy: FailurePolicy,
    ) -> Result<StatusRecord>
    where
        S: FieldSource + ?Sized,
    {
        let mut fields = Vec::with_capacity(definition.fields.len());
        let mut failures = Vec::new();

        for spec in definition.fields {
            match Self::decode_field(spec, source.field(spec.name)) {
                Ok(value) => fields.push((spec.name, value)),
                Err(error) => {
                    failures.push(FieldFailure {
                        field: spec.name,
                        required: spec.required,
                        error,
                    });
                }
            }
        }

        if failures.iter().any(|f| policy.is_fatal(f.required)) {
            log::debug!(
                "Composition of {} failed with {} field error(s)",
                definition.element,
                failures.len()
            );
            return Err(CompositionError {
                element: definition.element,
                failures,
                partial: fields,
            }
            .into());
        }

        if !failures.is_empty() {
            for failure in &failures {
                log::warn!("{}: ignoring optional field {}", definition.element, failure);
            }
            // Re-slot tolerated failures as null so the record keeps its full key set
            fields = definition
                .fields
                .iter()
                .map(|spec| {
                    let value = fields
                        .iter()
                        .find(|(name, _)| *name == spec.name)
                        .map(|(_, v)| v.clone())
                        .unwrap_or(FieldValue::Absent);
                    (spec.name, value)
                })
                .collect();
        }

        Ok(StatusRecord::new(definition.element, fields, failures))
    }

    /// Decode a single field according to its strategy
    ///
    /// An absent optional field decodes to `FieldValue::Absent`; an absent
    /// required field is a `MissingField` error. An explicit `null` counts as
    /// absent.
    pub fn decode_field(
        spec: &FieldSpec,
        raw: Option<&RawField>,
    ) -> std::result::Result<FieldValue, DecodeError> {
        let raw = match raw.filter(|raw| !raw.is_null()) {
            Some(raw) => raw,
            None if spec.required => return Err(DecodeError::MissingField(spec.name)),
            None => return Ok(FieldValue::Absent),
        };

        match (spec.strategy, raw) {
            (DecodeStrategy::Enum(table), RawField::Integer(code)) => {
                EnumCodeMapper::decode(*code, table).map(FieldValue::Label)
            }
            (DecodeStrategy::Bitfield(map), RawField::Bytes(bytes)) => {
                BitfieldDecoder::decode(bytes, map).map(FieldValue::Flags)
            }
            (DecodeStrategy::Passthrough, RawField::Integer(value)) => {
                Ok(FieldValue::Integer(*value))
            }
            (strategy, raw) => Err(DecodeError::UnexpectedKind {
                field: spec.name,
                expected: strategy.expected_kind(),
                actual: raw.kind(),
            }),
        }
    }
}
