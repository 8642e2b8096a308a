//! Per-element field lists
//!
//! An element definition is the ordered list of fields a status record is
//! composed from. The declaration order is the decode order and the key order
//! of the serialized record.

use super::bitmaps::{self, BitPositionMap};
use super::tables::{self, EnumLookupTable};
use crate::registry::ElementType;

/// How a raw field is turned into a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Integer code looked up in an enumeration table
    Enum(&'static EnumLookupTable),
    /// Bit string decoded against a bit map
    Bitfield(&'static BitPositionMap),
    /// Integer copied through unchanged
    Passthrough,
}

impl DecodeStrategy {
    /// Raw value kind this strategy consumes
    pub fn expected_kind(&self) -> &'static str {
        match self {
            DecodeStrategy::Enum(_) | DecodeStrategy::Passthrough => "integer",
            DecodeStrategy::Bitfield(_) => "bytes",
        }
    }
}

/// One field of a status record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used both as the upstream accessor and the output key
    pub name: &'static str,
    pub strategy: DecodeStrategy,
    /// A failing required field fails the whole record
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, strategy: DecodeStrategy) -> Self {
        Self {
            name,
            strategy,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, strategy: DecodeStrategy) -> Self {
        Self {
            name,
            strategy,
            required: false,
        }
    }
}

/// The complete field list of one element type
#[derive(Debug, PartialEq, Eq)]
pub struct ElementDefinition {
    pub element: ElementType,
    pub fields: &'static [FieldSpec],
}

pub static BRAKE_SYSTEM_STATUS: ElementDefinition = ElementDefinition {
    element: ElementType::BrakeSystemStatus,
    fields: &[
        FieldSpec::required(
            "wheelBrakes",
            DecodeStrategy::Bitfield(&bitmaps::BRAKE_APPLIED_STATUS),
        ),
        FieldSpec::required(
            "traction",
            DecodeStrategy::Enum(&tables::TRACTION_CONTROL_STATUS),
        ),
        FieldSpec::required("abs", DecodeStrategy::Enum(&tables::ANTI_LOCK_BRAKE_STATUS)),
        FieldSpec::required("scs", DecodeStrategy::Enum(&tables::STABILITY_CONTROL_STATUS)),
        FieldSpec::required(
            "brakeBoost",
            DecodeStrategy::Enum(&tables::BRAKE_BOOST_APPLIED),
        ),
        FieldSpec::required(
            "auxBrakes",
            DecodeStrategy::Enum(&tables::AUXILIARY_BRAKE_STATUS),
        ),
    ],
};

pub static WIPER_SET: ElementDefinition = ElementDefinition {
    element: ElementType::WiperSet,
    fields: &[
        FieldSpec::required("statusFront", DecodeStrategy::Enum(&tables::WIPER_STATUS)),
        FieldSpec::required("rateFront", DecodeStrategy::Passthrough),
        FieldSpec::optional("statusRear", DecodeStrategy::Enum(&tables::WIPER_STATUS)),
        FieldSpec::optional("rateRear", DecodeStrategy::Passthrough),
    ],
};

pub static EXTERIOR_LIGHTS: ElementDefinition = ElementDefinition {
    element: ElementType::ExteriorLights,
    fields: &[FieldSpec::required(
        "lights",
        DecodeStrategy::Bitfield(&bitmaps::EXTERIOR_LIGHTS),
    )],
};

pub static VEHICLE_EVENT_FLAGS: ElementDefinition = ElementDefinition {
    element: ElementType::VehicleEventFlags,
    fields: &[FieldSpec::required(
        "events",
        DecodeStrategy::Bitfield(&bitmaps::VEHICLE_EVENT_FLAGS),
    )],
};

pub static TRANSMISSION_STATE: ElementDefinition = ElementDefinition {
    element: ElementType::TransmissionState,
    fields: &[FieldSpec::required(
        "transmission",
        DecodeStrategy::Enum(&tables::TRANSMISSION_STATE),
    )],
};

pub static GNSS_STATUS: ElementDefinition = ElementDefinition {
    element: ElementType::GnssStatus,
    fields: &[FieldSpec::required(
        "status",
        DecodeStrategy::Bitfield(&bitmaps::GNSS_STATUS),
    )],
};

pub static EMERGENCY_DETAILS: ElementDefinition = ElementDefinition {
    element: ElementType::EmergencyDetails,
    fields: &[
        FieldSpec::required("sirenUse", DecodeStrategy::Enum(&tables::SIREN_IN_USE)),
        FieldSpec::required("lightsUse", DecodeStrategy::Enum(&tables::LIGHTBAR_IN_USE)),
    ],
};

/// Every element definition, in `ElementType::ALL` order
pub static ALL_ELEMENTS: &[&ElementDefinition] = &[
    &BRAKE_SYSTEM_STATUS,
    &WIPER_SET,
    &EXTERIOR_LIGHTS,
    &VEHICLE_EVENT_FLAGS,
    &TRANSMISSION_STATE,
    &GNSS_STATUS,
    &EMERGENCY_DETAILS,
];
