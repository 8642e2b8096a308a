//! Closed set of supported message elements
//!
//! Every element type has exactly one translator function wiring its static
//! definition into the composer. Adding an element means adding a variant, a
//! definition and a function here; there is no runtime registration.

use crate::composer::StatusComposer;
use crate::config::FailurePolicy;
use crate::definitions::elements;
use crate::definitions::ElementDefinition;
use crate::message::FieldSource;
use crate::types::{Result, StatusRecord, TranslateError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported J2735 message element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    BrakeSystemStatus,
    WiperSet,
    ExteriorLights,
    VehicleEventFlags,
    TransmissionState,
    GnssStatus,
    EmergencyDetails,
}

impl ElementType {
    /// Every supported element type
    pub const ALL: &'static [ElementType] = &[
        ElementType::BrakeSystemStatus,
        ElementType::WiperSet,
        ElementType::ExteriorLights,
        ElementType::VehicleEventFlags,
        ElementType::TransmissionState,
        ElementType::GnssStatus,
        ElementType::EmergencyDetails,
    ];

    /// Element name as used on the upstream boundary
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::BrakeSystemStatus => "BrakeSystemStatus",
            ElementType::WiperSet => "WiperSet",
            ElementType::ExteriorLights => "ExteriorLights",
            ElementType::VehicleEventFlags => "VehicleEventFlags",
            ElementType::TransmissionState => "TransmissionState",
            ElementType::GnssStatus => "GnssStatus",
            ElementType::EmergencyDetails => "EmergencyDetails",
        }
    }

    /// Static field list of this element type
    pub fn definition(&self) -> &'static ElementDefinition {
        match self {
            ElementType::BrakeSystemStatus => &elements::BRAKE_SYSTEM_STATUS,
            ElementType::WiperSet => &elements::WIPER_SET,
            ElementType::ExteriorLights => &elements::EXTERIOR_LIGHTS,
            ElementType::VehicleEventFlags => &elements::VEHICLE_EVENT_FLAGS,
            ElementType::TransmissionState => &elements::TRANSMISSION_STATE,
            ElementType::GnssStatus => &elements::GNSS_STATUS,
            ElementType::EmergencyDetails => &elements::EMERGENCY_DETAILS,
        }
    }

    /// Translate one decoded element of this type
    pub fn translate<S>(&self, source: &S, policy: FailurePolicy) -> Result<StatusRecord>
    where
        S: FieldSource + ?Sized,
    {
        match self {
            ElementType::BrakeSystemStatus => translate_brake_system_status(source, policy),
            ElementType::WiperSet => translate_wiper_set(source, policy),
            ElementType::ExteriorLights => translate_exterior_lights(source, policy),
            ElementType::VehicleEventFlags => translate_vehicle_event_flags(source, policy),
            ElementType::TransmissionState => translate_transmission_state(source, policy),
            ElementType::GnssStatus => translate_gnss_status(source, policy),
            ElementType::EmergencyDetails => translate_emergency_details(source, policy),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ElementType {
    type Err = TranslateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| TranslateError::UnsupportedElement(s.to_string()))
    }
}

/// BrakeSystemStatus: wheel brake flags plus five brake subsystem states
pub fn translate_brake_system_status<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::BRAKE_SYSTEM_STATUS, source, policy)
}

/// WiperSet: front wiper state and rate, optional rear wiper state and rate
pub fn translate_wiper_set<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::WIPER_SET, source, policy)
}

pub fn translate_exterior_lights<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::EXTERIOR_LIGHTS, source, policy)
}

pub fn translate_vehicle_event_flags<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::VEHICLE_EVENT_FLAGS, source, policy)
}

pub fn translate_transmission_state<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::TRANSMISSION_STATE, source, policy)
}

pub fn translate_gnss_status<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::GNSS_STATUS, source, policy)
}

/// EmergencyDetails: siren and light bar usage
pub fn translate_emergency_details<S>(source: &S, policy: FailurePolicy) -> Result<StatusRecord>
where
    S: FieldSource + ?Sized,
{
    StatusComposer::compose_with(&elements::EMERGENCY_DETAILS, source, policy)
}
