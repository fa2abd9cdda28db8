//! Ticket domain entity

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::floor::ParkingFloor;
use crate::domain::spot::{ParkingSpot, SpotId};
use crate::domain::tariff::FeeBreakdown;
use crate::domain::vehicle::Vehicle;
use crate::shared::errors::{ParkingError, ParkingResult};

/// Unique ticket identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Floor levels that map to a label letter, `A` through `Z`
pub const LABELLED_LEVELS: RangeInclusive<u32> = 1..=26;

/// Human-readable spot label: floor letter followed by the spot number,
/// e.g. `A12` for spot 12 on level 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotLabel(String);

impl SpotLabel {
    /// Level 1 maps to `A`, level 26 to `Z`. Other levels have no letter.
    pub fn derive(level: u32, spot: SpotId) -> ParkingResult<Self> {
        if !LABELLED_LEVELS.contains(&level) {
            return Err(ParkingError::TicketIssue(format!(
                "floor level {} has no label letter",
                level
            )));
        }
        let letter = char::from(b'A' + (level - 1) as u8);
        Ok(Self(format!("{}{}", letter, spot.number())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Vehicle is parked
    Active,
    /// Exit processed and paid
    Completed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Parking ticket.
///
/// Not `Clone`. Exit processing takes `&mut Ticket`, so two exits of the
/// same ticket cannot interleave.
#[derive(Debug)]
pub struct Ticket {
    id: TicketId,
    vehicle: Vehicle,
    floor: Arc<ParkingFloor>,
    spot: Arc<ParkingSpot>,
    spot_label: SpotLabel,
    entry_time: DateTime<Utc>,
    exit_time: Option<DateTime<Utc>>,
    price: Option<i64>,
    fee: Option<FeeBreakdown>,
    is_paid: bool,
}

impl Ticket {
    pub fn builder() -> TicketBuilder {
        TicketBuilder::default()
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn floor(&self) -> &Arc<ParkingFloor> {
        &self.floor
    }

    pub fn spot(&self) -> &Arc<ParkingSpot> {
        &self.spot
    }

    pub fn spot_label(&self) -> &SpotLabel {
        &self.spot_label
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn exit_time(&self) -> Option<DateTime<Utc>> {
        self.exit_time
    }

    pub fn price(&self) -> Option<i64> {
        self.price
    }

    pub fn fee(&self) -> Option<&FeeBreakdown> {
        self.fee.as_ref()
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn status(&self) -> TicketStatus {
        if self.exit_time.is_some() || self.is_paid {
            TicketStatus::Completed
        } else {
            TicketStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == TicketStatus::Active
    }

    /// Record exit time, price and payment. Exit-gate only; the gate has
    /// already checked that the ticket is still active.
    pub(crate) fn complete(&mut self, exit_time: DateTime<Utc>, fee: FeeBreakdown) {
        self.exit_time = Some(exit_time);
        self.price = Some(fee.total);
        self.fee = Some(fee);
        self.is_paid = true;
    }

    #[cfg(test)]
    pub(crate) fn force_paid(&mut self) {
        self.is_paid = true;
    }

    #[cfg(test)]
    pub(crate) fn force_exit_time(&mut self, at: DateTime<Utc>) {
        self.exit_time = Some(at);
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------------------------------------")?;
        writeln!(f, "Ticket ID: {}", self.id)?;
        writeln!(f, "Vehicle Type: {}", self.vehicle.class())?;
        writeln!(f, "Registration Number: {}", self.vehicle.registration())?;
        writeln!(f, "Parking Spot: {}", self.spot_label)?;
        writeln!(f, "Entry Time: {}", self.entry_time.format("%Y-%m-%d %H:%M:%S"))?;
        match self.exit_time {
            Some(exit) => writeln!(f, "Exit Time: {}", exit.format("%Y-%m-%d %H:%M:%S"))?,
            None => writeln!(f, "Exit Time: -")?,
        }
        match self.price {
            Some(price) => writeln!(f, "Price: {}", price)?,
            None => writeln!(f, "Price: -")?,
        }
        writeln!(f, "Paid: {}", if self.is_paid { "Yes" } else { "No" })?;
        write!(f, "------------------------------------")
    }
}

/// Assembles a ticket from the pieces an entry gate collects.
///
/// The label is derived from the floor level and spot id when the entry time
/// is stamped, and frozen from then on.
#[derive(Default)]
pub struct TicketBuilder {
    vehicle: Option<Vehicle>,
    floor: Option<Arc<ParkingFloor>>,
    spot: Option<Arc<ParkingSpot>>,
}

impl TicketBuilder {
    pub fn vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn floor(mut self, floor: Arc<ParkingFloor>) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn spot(mut self, spot: Arc<ParkingSpot>) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Stamp the entry time and build the ticket.
    pub fn issue_at(self, entry_time: DateTime<Utc>) -> ParkingResult<Ticket> {
        let vehicle = self
            .vehicle
            .ok_or_else(|| ParkingError::TicketIssue("no vehicle set".to_string()))?;
        let floor = self
            .floor
            .ok_or_else(|| ParkingError::TicketIssue("no floor set".to_string()))?;
        let spot = self
            .spot
            .ok_or_else(|| ParkingError::TicketIssue("no spot set".to_string()))?;

        if floor.spot(spot.id()).is_none() {
            return Err(ParkingError::TicketIssue(format!(
                "{} is not on floor level {}",
                spot.id(),
                floor.level()
            )));
        }

        let spot_label = SpotLabel::derive(floor.level(), spot.id())?;

        Ok(Ticket {
            id: TicketId::new(),
            vehicle,
            floor,
            spot,
            spot_label,
            entry_time,
            exit_time: None,
            price: None,
            fee: None,
            is_paid: false,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tariff::FeeSchedule;
    use crate::domain::vehicle::VehicleClass;

    fn floor_with_spot(level: u32, number: u32) -> (Arc<ParkingFloor>, Arc<ParkingSpot>) {
        let spot = Arc::new(ParkingSpot::new(
            SpotId::new(number),
            VehicleClass::LightMotorVehicle,
        ));
        let mut floor = ParkingFloor::new(level);
        floor.assign_spots(vec![spot.clone()]).unwrap();
        (Arc::new(floor), spot)
    }

    fn sample_ticket() -> Ticket {
        let (floor, spot) = floor_with_spot(1, 5);
        Ticket::builder()
            .vehicle(Vehicle::new(VehicleClass::LightMotorVehicle, "KA01AB1234"))
            .floor(floor)
            .spot(spot)
            .issue_at(Utc::now())
            .unwrap()
    }

    #[test]
    fn label_letters() {
        assert_eq!(SpotLabel::derive(1, SpotId::new(5)).unwrap().as_str(), "A5");
        assert_eq!(SpotLabel::derive(2, SpotId::new(51)).unwrap().as_str(), "B51");
        assert_eq!(SpotLabel::derive(26, SpotId::new(1)).unwrap().as_str(), "Z1");
        assert!(SpotLabel::derive(0, SpotId::new(1)).is_err());
        assert!(SpotLabel::derive(27, SpotId::new(1)).is_err());
    }

    #[test]
    fn new_ticket_is_active_and_unpaid() {
        let t = sample_ticket();
        assert_eq!(t.status(), TicketStatus::Active);
        assert!(t.is_active());
        assert!(!t.is_paid());
        assert!(t.exit_time().is_none());
        assert!(t.price().is_none());
        assert_eq!(t.spot_label().as_str(), "A5");
    }

    #[test]
    fn complete_sets_exit_price_and_paid() {
        let mut t = sample_ticket();
        let fee = FeeSchedule.quote(VehicleClass::LightMotorVehicle, 6);
        let exit = t.entry_time() + chrono::Duration::hours(6);
        t.complete(exit, fee);
        assert_eq!(t.exit_time(), Some(exit));
        assert_eq!(t.price(), Some(140));
        assert_eq!(t.fee().map(|f| f.extra_hours), Some(2));
        assert!(t.is_paid());
        assert_eq!(t.status(), TicketStatus::Completed);
    }

    #[test]
    fn builder_requires_all_parts() {
        let (floor, _) = floor_with_spot(1, 1);
        let err = Ticket::builder().floor(floor).issue_at(Utc::now()).unwrap_err();
        assert!(matches!(err, ParkingError::TicketIssue(_)));
    }

    #[test]
    fn builder_rejects_spot_from_another_floor() {
        let (floor, _) = floor_with_spot(1, 1);
        let (_, foreign) = floor_with_spot(2, 2);
        let err = Ticket::builder()
            .vehicle(Vehicle::new(VehicleClass::LightMotorVehicle, "A1"))
            .floor(floor)
            .spot(foreign)
            .issue_at(Utc::now())
            .unwrap_err();
        assert!(matches!(err, ParkingError::TicketIssue(_)));
    }

    #[test]
    fn display_contains_label_and_registration() {
        let t = sample_ticket();
        let rendered = t.to_string();
        assert!(rendered.contains("Parking Spot: A5"));
        assert!(rendered.contains("KA01AB1234"));
        assert!(rendered.contains("Paid: No"));
    }
}
