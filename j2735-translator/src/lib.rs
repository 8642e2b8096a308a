//! J2735 Translator Library
//!
//! A stateless, reusable library for translating SAE J2735 message elements,
//! already decoded from UPER by an ASN.1 codec, into labeled JSON-ready
//! status records.
//!
//! # Architecture
//!
//! The library is table-driven:
//! - Enumeration codes are mapped to labels through static lookup tables
//! - Bit strings are decoded MSB-first through static bit position maps, with
//!   an optional "unavailable" sentinel bit that overrides all other flags
//! - Each supported element type is a fixed list of fields composed into one
//!   immutable `StatusRecord`
//!
//! The library does NOT:
//! - Decode ASN.1 / UPER bytes
//! - Consume from message brokers or manage offsets
//! - Persist or publish records
//!
//! Ingestion lives in the application layer (j2735-cli).
//!
//! # Example Usage
//!
//! ```
//! use j2735_translator::{RawElement, Translator, TranslatorConfig};
//!
//! let translator = Translator::with_config(TranslatorConfig::new());
//!
//! let element = RawElement::new("WiperSet")
//!     .with_integer("statusFront", 5)
//!     .with_integer("rateFront", 12);
//!
//! let translated = translator.translate(&element)?;
//! let json = translated.record.to_json()?;
//! assert_eq!(json["statusFront"], "washerInUse");
//! assert!(json["statusRear"].is_null());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Public modules
pub mod bitfield;
pub mod composer;
pub mod config;
pub mod definitions;
pub mod enum_mapper;
pub mod message;
pub mod registry;
pub mod translator;
pub mod types;

// Re-export main types for convenience
pub use bitfield::BitfieldDecoder;
pub use composer::StatusComposer;
pub use config::{FailurePolicy, TranslatorConfig};
pub use definitions::{BitPositionMap, DefinitionStats, EnumLookupTable};
pub use enum_mapper::EnumCodeMapper;
pub use message::{FieldSource, RawElement};
pub use registry::ElementType;
pub use translator::{TranslatedMessage, Translator};
pub use types::{
    CompositionError, DecodeError, DecodedFlagSet, FieldFailure, FieldValue, RawField, Result,
    StatusRecord, Timestamp, TranslateError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
