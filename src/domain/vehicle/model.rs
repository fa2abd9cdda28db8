//! Vehicle domain entity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::errors::{ParkingError, ParkingResult};

/// Vehicle class. Determines which spots a vehicle fits and what it pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    #[serde(rename = "TW")]
    TwoWheeler,
    #[serde(rename = "LMV")]
    LightMotorVehicle,
    #[serde(rename = "HMV")]
    HeavyMotorVehicle,
    #[serde(rename = "EV")]
    ElectricVehicle,
}

impl VehicleClass {
    /// All classes, in the order a floor lays out its spots.
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::LightMotorVehicle,
        VehicleClass::TwoWheeler,
        VehicleClass::HeavyMotorVehicle,
        VehicleClass::ElectricVehicle,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::TwoWheeler => "TW",
            Self::LightMotorVehicle => "LMV",
            Self::HeavyMotorVehicle => "HMV",
            Self::ElectricVehicle => "EV",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TwoWheeler => "two-wheeler",
            Self::LightMotorVehicle => "light motor vehicle",
            Self::HeavyMotorVehicle => "heavy motor vehicle",
            Self::ElectricVehicle => "electric vehicle",
        }
    }
}

impl Default for VehicleClass {
    fn default() -> Self {
        Self::LightMotorVehicle
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VehicleClass {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(|c: char| c == '_' || c == ' ', "-");
        match normalized.as_str() {
            "tw" | "two-wheeler" => Ok(Self::TwoWheeler),
            "lmv" | "light-motor-vehicle" => Ok(Self::LightMotorVehicle),
            "hmv" | "heavy-motor-vehicle" => Ok(Self::HeavyMotorVehicle),
            "ev" | "electric-vehicle" => Ok(Self::ElectricVehicle),
            _ => Err(ParkingError::InvalidVehicle(format!(
                "unknown vehicle class '{}'",
                s
            ))),
        }
    }
}

/// Unique vehicle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(Uuid);

impl VehicleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle entity. Identity is fixed; class and registration can be corrected
/// by the caller before the vehicle is parked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    class: VehicleClass,
    registration: String,
}

impl Vehicle {
    pub fn new(class: VehicleClass, registration: impl Into<String>) -> Self {
        Self {
            id: VehicleId::new(),
            class,
            registration: registration.into(),
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn class(&self) -> VehicleClass {
        self.class
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    pub fn set_class(&mut self, class: VehicleClass) {
        self.class = class;
    }

    pub fn set_registration(&mut self, registration: impl Into<String>) {
        self.registration = registration.into();
    }

    /// Check that the vehicle can be admitted: a non-blank registration made
    /// of ASCII letters, digits, spaces and dashes.
    pub fn validate(&self) -> ParkingResult<()> {
        let reg = self.registration.trim();
        if reg.is_empty() {
            return Err(ParkingError::InvalidVehicle(format!(
                "vehicle {} has no registration number",
                self.id
            )));
        }
        if !reg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
        {
            return Err(ParkingError::InvalidVehicle(format!(
                "registration '{}' contains invalid characters",
                reg
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vehicle ID: {},\nType: {},\nRegistration Number: {}",
            self.id, self.class, self.registration
        )
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_and_names() {
        assert_eq!("TW".parse::<VehicleClass>().unwrap(), VehicleClass::TwoWheeler);
        assert_eq!("lmv".parse::<VehicleClass>().unwrap(), VehicleClass::LightMotorVehicle);
        assert_eq!(
            "Heavy Motor Vehicle".parse::<VehicleClass>().unwrap(),
            VehicleClass::HeavyMotorVehicle
        );
        assert_eq!(
            "electric_vehicle".parse::<VehicleClass>().unwrap(),
            VehicleClass::ElectricVehicle
        );
        assert!(matches!(
            "bus".parse::<VehicleClass>(),
            Err(ParkingError::InvalidVehicle(_))
        ));
    }

    #[test]
    fn display_uses_short_code() {
        assert_eq!(VehicleClass::ElectricVehicle.to_string(), "EV");
        assert_eq!(VehicleClass::default(), VehicleClass::LightMotorVehicle);
    }

    #[test]
    fn serde_uses_short_code() {
        let json = serde_json::to_string(&VehicleClass::TwoWheeler).unwrap();
        assert_eq!(json, "\"TW\"");
        let back: VehicleClass = serde_json::from_str("\"HMV\"").unwrap();
        assert_eq!(back, VehicleClass::HeavyMotorVehicle);
    }

    #[test]
    fn setters_keep_identity() {
        let mut v = Vehicle::new(VehicleClass::LightMotorVehicle, "KA01AB1234");
        let id = v.id();
        v.set_class(VehicleClass::ElectricVehicle);
        v.set_registration("KA01EV0001");
        assert_eq!(v.id(), id);
        assert_eq!(v.class(), VehicleClass::ElectricVehicle);
        assert_eq!(v.registration(), "KA01EV0001");
    }

    #[test]
    fn validate_rejects_blank_registration() {
        let v = Vehicle::new(VehicleClass::TwoWheeler, "   ");
        assert!(matches!(v.validate(), Err(ParkingError::InvalidVehicle(_))));
    }

    #[test]
    fn validate_rejects_odd_characters() {
        let v = Vehicle::new(VehicleClass::TwoWheeler, "KA01;DROP");
        assert!(v.validate().is_err());
        let ok = Vehicle::new(VehicleClass::TwoWheeler, "KA-01 AB 1234");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn vehicles_get_distinct_ids() {
        let a = Vehicle::new(VehicleClass::TwoWheeler, "A1");
        let b = Vehicle::new(VehicleClass::TwoWheeler, "A1");
        assert_ne!(a.id(), b.id());
    }
}
