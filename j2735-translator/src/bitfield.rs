//! Bit string decoding
//!
//! Turns a packed, padded bit string into named boolean flags. Bit addressing
//! is MSB-first: bit 0 is the most significant bit of byte 0, bit 7 the least
//! significant bit of byte 0, bit 8 the MSB of byte 1.

use crate::definitions::BitPositionMap;
use crate::types::{DecodeError, DecodedFlagSet};

/// Bitfield decoder - extracts named flags from bit strings
pub struct BitfieldDecoder;

impl BitfieldDecoder {
    /// Decode a bit string against its bit position map
    ///
    /// The input must be exactly `map.byte_len` bytes long. When the map's
    /// sentinel bit is set, every declared flag is reported `false` and the
    /// sentinel's own flag (if the map surfaces one) is `true`.
    ///
    /// # Returns
    /// * `Ok(DecodedFlagSet)` with every declared flag present
    /// * `Err(DecodeError::BitWidthMismatch)` if the length is wrong
    pub fn decode(bytes: &[u8], map: &'static BitPositionMap) -> Result<DecodedFlagSet, DecodeError> {
        let actual = bytes.len() * 8;
        if actual != map.bit_width() {
            return Err(DecodeError::BitWidthMismatch {
                map: map.name,
                expected: map.bit_width(),
                actual,
            });
        }

        let unavailable = map
            .sentinel
            .map_or(false, |s| Self::bit_at(bytes, s.bit as usize));

        let mut flags = DecodedFlagSet::with_capacity(map.flag_count());
        for &(bit, name) in map.positions {
            let value = !unavailable && Self::bit_at(bytes, bit as usize);
            flags.push(name, value);
        }

        if let Some(flag) = map.sentinel.and_then(|s| s.flag) {
            flags.push(flag, unavailable);
        }

        Ok(flags)
    }

    /// Read one bit, MSB-first within each byte
    ///
    /// Callers guarantee `bit_pos < bytes.len() * 8`.
    fn bit_at(bytes: &[u8], bit_pos: usize) -> bool {
        let byte_idx = bit_pos / 8;
        let bit_in_byte = 7 - (bit_pos % 8); // Bit 0 = MSB, bit 7 = LSB
        (bytes[byte_idx] >> bit_in_byte) & 0x01 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::bitmaps::{
        Sentinel, BRAKE_APPLIED_STATUS, EXTERIOR_LIGHTS, GNSS_STATUS, VEHICLE_EVENT_FLAGS,
    };

    /// Sentinel that suppresses flags without surfacing its own
    static SILENT_SENTINEL: BitPositionMap = BitPositionMap {
        name: "SilentSentinel",
        byte_len: 1,
        positions: &[(1, "first"), (2, "second")],
        sentinel: Some(Sentinel { bit: 0, flag: None }),
    };

    fn only(flags: &DecodedFlagSet, expected: &[&str]) {
        for (name, value) in flags.iter() {
            assert_eq!(
                value,
                expected.contains(&name),
                "unexpected value for flag {}",
                name
            );
        }
    }

    #[test]
    fn test_bit_at_msb_first() {
        let data = [0b1000_0000, 0b0000_0001];
        assert!(BitfieldDecoder::bit_at(&data, 0));
        assert!(!BitfieldDecoder::bit_at(&data, 1));
        assert!(!BitfieldDecoder::bit_at(&data, 7));
        assert!(!BitfieldDecoder::bit_at(&data, 8));
        assert!(BitfieldDecoder::bit_at(&data, 15));
    }

    #[test]
    fn test_wheel_brakes_all_off() {
        let flags = BitfieldDecoder::decode(&[0b0000_0000], &BRAKE_APPLIED_STATUS).unwrap();
        assert_eq!(flags.len(), 5);
        only(&flags, &[]);
    }

    #[test]
    fn test_wheel_brakes_left_front() {
        let flags = BitfieldDecoder::decode(&[0b0100_0000], &BRAKE_APPLIED_STATUS).unwrap();
        only(&flags, &["leftFront"]);
    }

    #[test]
    fn test_wheel_brakes_right_rear() {
        let flags = BitfieldDecoder::decode(&[0b0000_1000], &BRAKE_APPLIED_STATUS).unwrap();
        only(&flags, &["rightRear"]);
    }

    #[test]
    fn test_wheel_brakes_two_on() {
        let flags = BitfieldDecoder::decode(&[0b0101_0000], &BRAKE_APPLIED_STATUS).unwrap();
        assert_eq!(flags.get("leftFront"), Some(true));
        assert_eq!(flags.get("rightFront"), Some(true));
        assert_eq!(flags.get("leftRear"), Some(false));
        assert_eq!(flags.get("rightRear"), Some(false));
        assert_eq!(flags.get("unavailable"), Some(false));
    }

    #[test]
    fn test_wheel_brakes_all_wheels_on() {
        let flags = BitfieldDecoder::decode(&[0b0111_1000], &BRAKE_APPLIED_STATUS).unwrap();
        only(&flags, &["leftFront", "leftRear", "rightFront", "rightRear"]);
    }

    #[test]
    fn test_sentinel_alone() {
        let flags = BitfieldDecoder::decode(&[0b1000_0000], &BRAKE_APPLIED_STATUS).unwrap();
        only(&flags, &["unavailable"]);
    }

    #[test]
    fn test_sentinel_suppresses_other_bits() {
        let flags = BitfieldDecoder::decode(&[0b1111_1000], &BRAKE_APPLIED_STATUS).unwrap();
        only(&flags, &["unavailable"]);
    }

    #[test]
    fn test_padding_bits_ignored() {
        let flags = BitfieldDecoder::decode(&[0b0100_0111], &BRAKE_APPLIED_STATUS).unwrap();
        only(&flags, &["leftFront"]);
    }

    #[test]
    fn test_width_mismatch_too_short() {
        let err = BitfieldDecoder::decode(&[0x01], &EXTERIOR_LIGHTS).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BitWidthMismatch {
                map: "ExteriorLights",
                expected: 16,
                actual: 8,
            }
        );
    }

    #[test]
    fn test_width_mismatch_too_long() {
        assert!(BitfieldDecoder::decode(&[0x40, 0x00], &BRAKE_APPLIED_STATUS).is_err());
        assert!(BitfieldDecoder::decode(&[], &BRAKE_APPLIED_STATUS).is_err());
    }

    #[test]
    fn test_cross_byte_flag() {
        // parkingLightsOn is bit 8, the MSB of the second octet
        let flags = BitfieldDecoder::decode(&[0x00, 0b1000_0000], &EXTERIOR_LIGHTS).unwrap();
        only(&flags, &["parkingLightsOn"]);

        let flags = BitfieldDecoder::decode(&[0b1000_0001, 0x00], &EXTERIOR_LIGHTS).unwrap();
        only(&flags, &["lowBeamHeadlightsOn", "fogLightOn"]);
    }

    #[test]
    fn test_map_without_sentinel_has_no_unavailable_flag() {
        let flags = BitfieldDecoder::decode(&[0xFF, 0xFF], &VEHICLE_EVENT_FLAGS).unwrap();
        assert_eq!(flags.len(), 13);
        assert_eq!(flags.get("unavailable"), None);
        assert!(flags.iter().all(|(_, v)| v));
    }

    #[test]
    fn test_sentinel_without_flag() {
        assert!(SILENT_SENTINEL.validate().is_ok());
        assert_eq!(SILENT_SENTINEL.flag_count(), 2);

        for byte in [0b1000_0000, 0b1100_0000, 0b1110_0000] {
            let flags = BitfieldDecoder::decode(&[byte], &SILENT_SENTINEL).unwrap();
            assert_eq!(flags.len(), 2);
            assert_eq!(flags.get("unavailable"), None);
            only(&flags, &[]);
        }

        let flags = BitfieldDecoder::decode(&[0b0100_0000], &SILENT_SENTINEL).unwrap();
        only(&flags, &["first"]);
    }

    #[test]
    fn test_gnss_sentinel() {
        let flags = BitfieldDecoder::decode(&[0b0110_0000], &GNSS_STATUS).unwrap();
        only(&flags, &["isHealthy", "isMonitored"]);

        let flags = BitfieldDecoder::decode(&[0xFF], &GNSS_STATUS).unwrap();
        only(&flags, &["unavailable"]);
    }
}
