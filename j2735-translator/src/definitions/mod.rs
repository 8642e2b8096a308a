//! Static element definitions
//!
//! Lookup tables, bit maps and per-element field lists for the supported
//! J2735 message elements. Everything here is `static` data shared read-only
//! across all translation calls.

pub mod bitmaps;
pub mod elements;
pub mod tables;

// Re-export key types for convenience
pub use bitmaps::BitPositionMap;
pub use elements::{DecodeStrategy, ElementDefinition, FieldSpec};
pub use tables::EnumLookupTable;

/// Counts over all static definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionStats {
    /// Number of supported element types
    pub num_elements: usize,
    /// Number of enumeration lookup tables
    pub num_tables: usize,
    /// Number of bit position maps
    pub num_bitmaps: usize,
    /// Total number of declared record fields
    pub num_fields: usize,
}

/// Collect statistics about the static definitions
pub fn stats() -> DefinitionStats {
    let elements = elements::ALL_ELEMENTS;
    DefinitionStats {
        num_elements: elements.len(),
        num_tables: tables::ALL_TABLES.len(),
        num_bitmaps: bitmaps::ALL_BITMAPS.len(),
        num_fields: elements.iter().map(|e| e.fields.len()).sum(),
    }
}
