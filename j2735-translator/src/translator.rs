//! Main translator API
//!
//! The `Translator` is the entry point for turning decoded upstream elements
//! into labeled status records. It holds only configuration; all lookup
//! tables are static, so one translator can be shared across threads.

use crate::config::TranslatorConfig;
use crate::definitions::{self, DefinitionStats};
use crate::message::RawElement;
use crate::registry::ElementType;
use crate::types::{Result, StatusRecord, Timestamp, TranslateError};
use serde::Serialize;

/// A translated element with the metadata carried over from upstream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedMessage {
    pub element_type: ElementType,
    /// Upstream generation time, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    pub record: StatusRecord,
}

/// The main translator struct - entry point for all translation operations
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    /// Create a translator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a translator with the given configuration
    pub fn with_config(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate one decoded element
    ///
    /// # Returns
    /// * `Ok(TranslatedMessage)` on success
    /// * `Err(TranslateError::UnsupportedElement)` if the type tag is unknown
    /// * `Err(TranslateError::Filtered)` if the configuration excludes the type
    /// * `Err(TranslateError::Composition)` if a required field failed
    ///
    /// # Example
    /// ```
    /// use j2735_translator::{RawElement, Translator};
    ///
    /// let element = RawElement::new("BrakeSystemStatus")
    ///     .with_bytes("wheelBrakes", &[0b0100_0000])
    ///     .with_integer("traction", 3)
    ///     .with_integer("abs", 2)
    ///     .with_integer("scs", 1)
    ///     .with_integer("brakeBoost", 0)
    ///     .with_integer("auxBrakes", 0);
    ///
    /// let translated = Translator::new().translate(&element).unwrap();
    /// assert_eq!(translated.record.label("traction"), Some("engaged"));
    /// ```
    pub fn translate(&self, element: &RawElement) -> Result<TranslatedMessage> {
        let element_type: ElementType = element.element_type.parse()?;

        if !self.config.should_translate(element_type) {
            return Err(TranslateError::Filtered(element_type));
        }

        let record = element_type.translate(element, self.config.failure_policy)?;
        log::debug!("Translated {} ({} fields)", element_type, record.fields().len());

        Ok(TranslatedMessage {
            element_type,
            timestamp: element.timestamp(),
            record,
        })
    }

    /// Translate a stream of elements lazily
    ///
    /// Elements excluded by the configured filter are skipped silently; every
    /// other element yields exactly one result, in input order.
    pub fn translate_all<'a, I>(&'a self, elements: I) -> TranslatingIterator<'a, I::IntoIter>
    where
        I: IntoIterator<Item = &'a RawElement>,
    {
        TranslatingIterator {
            elements: elements.into_iter(),
            translator: self,
        }
    }

    /// Get statistics about the static element definitions
    pub fn definition_stats(&self) -> DefinitionStats {
        definitions::stats()
    }
}

/// Iterator that translates raw elements into records
///
/// Wraps an element iterator and translates each element on demand,
/// dropping the ones the configuration filters out.
pub struct TranslatingIterator<'a, I>
where
    I: Iterator<Item = &'a RawElement>,
{
    elements: I,
    translator: &'a Translator,
}

impl<'a, I> Iterator for TranslatingIterator<'a, I>
where
    I: Iterator<Item = &'a RawElement>,
{
    type Item = Result<TranslatedMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let element = self.elements.next()?;
            match self.translator.translate(element) {
                Err(TranslateError::Filtered(element_type)) => {
                    log::trace!("Skipping filtered element {}", element_type);
                }
                result => return Some(result),
            }
        }
    }
}
