//! Enumeration lookup tables
//!
//! Each table is an ordered list of labels indexed by the integer code the
//! upstream codec delivers. Codes are contiguous from 0 by construction, so a
//! code is valid exactly when it indexes into `labels`.

/// Ordered mapping from integer code to label for one enumeration type
#[derive(Debug, PartialEq, Eq)]
pub struct EnumLookupTable {
    /// ASN.1 type name (e.g., "TractionControlStatus")
    pub name: &'static str,
    /// Labels indexed by code
    pub labels: &'static [&'static str],
}

impl EnumLookupTable {
    /// Number of codes in the table's domain
    pub const fn len(&self) -> usize {
        self.labels.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Reverse lookup: code for a label
    pub fn code_of(&self, label: &str) -> Option<i64> {
        self.labels
            .iter()
            .position(|l| *l == label)
            .map(|idx| idx as i64)
    }

    /// Check the table is usable: non-empty, no duplicate labels
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.labels.is_empty() {
            return Err(format!("{}: table has no labels", self.name));
        }
        for (idx, label) in self.labels.iter().enumerate() {
            if self.labels[..idx].contains(label) {
                return Err(format!("{}: duplicate label '{}'", self.name, label));
            }
        }
        Ok(())
    }
}

pub static TRACTION_CONTROL_STATUS: EnumLookupTable = EnumLookupTable {
    name: "TractionControlStatus",
    labels: &["unavailable", "off", "on", "engaged"],
};

pub static ANTI_LOCK_BRAKE_STATUS: EnumLookupTable = EnumLookupTable {
    name: "AntiLockBrakeStatus",
    labels: &["unavailable", "off", "on", "engaged"],
};

pub static STABILITY_CONTROL_STATUS: EnumLookupTable = EnumLookupTable {
    name: "StabilityControlStatus",
    labels: &["unavailable", "off", "on", "engaged"],
};

pub static BRAKE_BOOST_APPLIED: EnumLookupTable = EnumLookupTable {
    name: "BrakeBoostApplied",
    labels: &["unavailable", "off", "on"],
};

pub static AUXILIARY_BRAKE_STATUS: EnumLookupTable = EnumLookupTable {
    name: "AuxiliaryBrakeStatus",
    labels: &["unavailable", "off", "on", "reserved"],
};

pub static WIPER_STATUS: EnumLookupTable = EnumLookupTable {
    name: "WiperStatus",
    labels: &[
        "unavailable",
        "off",
        "intermittent",
        "low",
        "high",
        "washerInUse",
        "automaticPresent",
    ],
};

/// Unlike the other tables, code 0 is a real state here; "unavailable" is 7
pub static TRANSMISSION_STATE: EnumLookupTable = EnumLookupTable {
    name: "TransmissionState",
    labels: &[
        "neutral",
        "park",
        "forwardGears",
        "reverseGears",
        "reserved1",
        "reserved2",
        "reserved3",
        "unavailable",
    ],
};

pub static SIREN_IN_USE: EnumLookupTable = EnumLookupTable {
    name: "SirenInUse",
    labels: &["unavailable", "notInUse", "inUse", "reserved"],
};

// "schooldBusLights" is the spelling used by the standard
pub static LIGHTBAR_IN_USE: EnumLookupTable = EnumLookupTable {
    name: "LightbarInUse",
    labels: &[
        "unavailable",
        "notInUse",
        "inUse",
        "yellowCautionLights",
        "schooldBusLights",
        "arrowSignsActive",
        "slowMovingVehicle",
        "freqStops",
    ],
};

/// Every table, for validation and statistics
pub static ALL_TABLES: &[&EnumLookupTable] = &[
    &TRACTION_CONTROL_STATUS,
    &ANTI_LOCK_BRAKE_STATUS,
    &STABILITY_CONTROL_STATUS,
    &BRAKE_BOOST_APPLIED,
    &AUXILIARY_BRAKE_STATUS,
    &WIPER_STATUS,
    &TRANSMISSION_STATE,
    &SIREN_IN_USE,
    &LIGHTBAR_IN_USE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_valid() {
        for table in ALL_TABLES {
            assert!(table.validate().is_ok(), "{:?}", table.validate());
        }
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        static BROKEN: EnumLookupTable = EnumLookupTable {
            name: "Broken",
            labels: &["off", "on", "off"],
        };
        let err = BROKEN.validate().unwrap_err();
        assert!(err.contains("duplicate label 'off'"));
    }

    #[test]
    fn test_validate_rejects_empty() {
        static EMPTY: EnumLookupTable = EnumLookupTable {
            name: "Empty",
            labels: &[],
        };
        assert!(EMPTY.validate().is_err());
        assert!(EMPTY.is_empty());
    }

    #[test]
    fn test_code_of() {
        assert_eq!(TRACTION_CONTROL_STATUS.code_of("engaged"), Some(3));
        assert_eq!(TRANSMISSION_STATE.code_of("unavailable"), Some(7));
        assert_eq!(WIPER_STATUS.code_of("turbo"), None);
    }
}
