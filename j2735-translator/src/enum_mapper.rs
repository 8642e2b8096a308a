//! Enumeration code mapping
//!
//! Maps a restricted integer code to its label. Codes outside a table's
//! domain are data-integrity errors; they are never coerced to
//! "unavailable".

use crate::definitions::EnumLookupTable;
use crate::types::DecodeError;

/// Enumeration code mapper - integer code to label
pub struct EnumCodeMapper;

impl EnumCodeMapper {
    /// Decode an enumeration code against its lookup table
    ///
    /// # Arguments
    /// * `code` - Integer code from the upstream codec
    /// * `table` - Lookup table for the field's enumeration type
    ///
    /// # Returns
    /// * `Ok(label)` for codes in `0..table.len()`
    /// * `Err(DecodeError::UnknownCode)` for anything else, including negative codes
    pub fn decode(code: i64, table: &'static EnumLookupTable) -> Result<&'static str, DecodeError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| table.labels.get(idx))
            .copied()
            .ok_or(DecodeError::UnknownCode {
                table: table.name,
                code,
                size: table.len(),
            })
    }
}
