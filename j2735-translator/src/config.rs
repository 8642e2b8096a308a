//! Translator configuration types
//!
//! The translation core is configured by static tables; this module only
//! carries the few runtime knobs an ingestion layer may want to set.

use crate::registry::ElementType;
use serde::{Deserialize, Serialize};

/// Which field failures fail a whole record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Only required fields fail the record; optional failures become `null`
    #[default]
    RequiredOnly,
    /// Any field failure fails the record
    AllFields,
}

impl FailurePolicy {
    /// Whether a failure of a field with the given requirement fails the record
    pub fn is_fatal(&self, required: bool) -> bool {
        match self {
            FailurePolicy::RequiredOnly => required,
            FailurePolicy::AllFields => true,
        }
    }
}

/// Configuration for the translator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Optional: only translate these element types
    #[serde(default)]
    pub element_filter: Option<Vec<ElementType>>,

    /// Record failure policy
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl TranslatorConfig {
    /// Create a new translator configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set element filter
    pub fn with_element_filter(mut self, elements: Vec<ElementType>) -> Self {
        self.element_filter = Some(elements);
        self
    }

    /// Builder method: set failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Check if an element type should be translated
    pub fn should_translate(&self, element: ElementType) -> bool {
        match &self.element_filter {
            Some(elements) => elements.contains(&element),
            None => true,
        }
    }
}
