//! Bit position maps for J2735 bit strings
//!
//! Bit numbering follows the ASN.1 BIT STRING convention: bit 0 is the most
//! significant bit of the first octet, bit 7 the least significant bit of the
//! first octet, bit 8 the MSB of the second octet, and so on.

/// Named positions within a fixed-width bit string
#[derive(Debug, PartialEq, Eq)]
pub struct BitPositionMap {
    /// ASN.1 type name (e.g., "BrakeAppliedStatus")
    pub name: &'static str,
    /// Exact number of octets the upstream codec delivers
    pub byte_len: usize,
    /// (bit index, flag name) pairs in declaration order
    pub positions: &'static [(u16, &'static str)],
    /// Optional "unavailable" bit that overrides every other flag
    pub sentinel: Option<Sentinel>,
}

/// Reserved "value not available" bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
    /// Bit index of the sentinel
    pub bit: u16,
    /// Flag name to surface in the decoded set, `None` if the record format
    /// does not carry an explicit unavailable flag
    pub flag: Option<&'static str>,
}

impl BitPositionMap {
    /// Declared width in bits, including trailing padding
    pub const fn bit_width(&self) -> usize {
        self.byte_len * 8
    }

    /// Number of entries a decoded flag set will hold
    pub fn flag_count(&self) -> usize {
        let synthetic = self
            .sentinel
            .map_or(0, |s| usize::from(s.flag.is_some()));
        self.positions.len() + synthetic
    }

    /// Check indices are unique, in range, and distinct from the sentinel
    pub fn validate(&self) -> std::result::Result<(), String> {
        let width = self.bit_width();

        for (idx, (bit, name)) in self.positions.iter().enumerate() {
            if *bit as usize >= width {
                return Err(format!(
                    "{}: flag '{}' at bit {} is outside width {}",
                    self.name, name, bit, width
                ));
            }
            if self.positions[..idx].iter().any(|(b, _)| b == bit) {
                return Err(format!("{}: bit {} declared twice", self.name, bit));
            }
            if self.positions[..idx].iter().any(|(_, n)| n == name) {
                return Err(format!("{}: flag '{}' declared twice", self.name, name));
            }
        }

        if let Some(sentinel) = self.sentinel {
            if sentinel.bit as usize >= width {
                return Err(format!(
                    "{}: sentinel bit {} is outside width {}",
                    self.name, sentinel.bit, width
                ));
            }
            if self.positions.iter().any(|(b, _)| *b == sentinel.bit) {
                return Err(format!(
                    "{}: sentinel bit {} is also declared as a flag",
                    self.name, sentinel.bit
                ));
            }
            if let Some(flag) = sentinel.flag {
                if self.positions.iter().any(|(_, n)| *n == flag) {
                    return Err(format!(
                        "{}: sentinel flag '{}' clashes with a declared flag",
                        self.name, flag
                    ));
                }
            }
        }

        Ok(())
    }
}

/// BrakeAppliedStatus ::= BIT STRING (SIZE (5)), one padded octet
pub static BRAKE_APPLIED_STATUS: BitPositionMap = BitPositionMap {
    name: "BrakeAppliedStatus",
    byte_len: 1,
    positions: &[
        (1, "leftFront"),
        (2, "leftRear"),
        (3, "rightFront"),
        (4, "rightRear"),
    ],
    sentinel: Some(Sentinel {
        bit: 0,
        flag: Some("unavailable"),
    }),
};

/// ExteriorLights ::= BIT STRING (SIZE (9)), two padded octets
pub static EXTERIOR_LIGHTS: BitPositionMap = BitPositionMap {
    name: "ExteriorLights",
    byte_len: 2,
    positions: &[
        (0, "lowBeamHeadlightsOn"),
        (1, "highBeamHeadlightsOn"),
        (2, "leftTurnSignalOn"),
        (3, "rightTurnSignalOn"),
        (4, "hazardSignalOn"),
        (5, "automaticLightControlOn"),
        (6, "daytimeRunningLightsOn"),
        (7, "fogLightOn"),
        (8, "parkingLightsOn"),
    ],
    sentinel: None,
};

/// VehicleEventFlags ::= BIT STRING (SIZE (13, ...)), two padded octets
pub static VEHICLE_EVENT_FLAGS: BitPositionMap = BitPositionMap {
    name: "VehicleEventFlags",
    byte_len: 2,
    positions: &[
        (0, "eventHazardLights"),
        (1, "eventStopLineViolation"),
        (2, "eventABSactivated"),
        (3, "eventTractionControlLoss"),
        (4, "eventStabilityControlactivated"),
        (5, "eventHazardousMaterials"),
        (6, "eventReserved1"),
        (7, "eventHardBraking"),
        (8, "eventLightsChanged"),
        (9, "eventWipersChanged"),
        (10, "eventFlatTire"),
        (11, "eventDisabledVehicle"),
        (12, "eventAirBagDeployment"),
    ],
    sentinel: None,
};

/// GNSSstatus ::= BIT STRING (SIZE (8))
pub static GNSS_STATUS: BitPositionMap = BitPositionMap {
    name: "GNSSstatus",
    byte_len: 1,
    positions: &[
        (1, "isHealthy"),
        (2, "isMonitored"),
        (3, "baseStationType"),
        (4, "aPDOPofUnder5"),
        (5, "inViewOfUnder5"),
        (6, "localCorrectionsPresent"),
        (7, "networkCorrectionsPresent"),
    ],
    sentinel: Some(Sentinel {
        bit: 0,
        flag: Some("unavailable"),
    }),
};

/// Every bit map, for validation and statistics
pub static ALL_BITMAPS: &[&BitPositionMap] = &[
    &BRAKE_APPLIED_STATUS,
    &EXTERIOR_LIGHTS,
    &VEHICLE_EVENT_FLAGS,
    &GNSS_STATUS,
];
