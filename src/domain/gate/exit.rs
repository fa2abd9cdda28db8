//! Exit gate: fee collection and spot release

use tracing::{info, warn};

use super::model::{GateId, OperationalFlag};
use crate::domain::tariff::{billable_hours, FeeSchedule};
use crate::domain::ticket::Ticket;
use crate::shared::clock::{system_clock, SharedClock};
use crate::shared::errors::{ParkingError, ParkingResult};

#[derive(Debug)]
pub struct ExitGate {
    id: GateId,
    operational: OperationalFlag,
    clock: SharedClock,
    schedule: FeeSchedule,
}

impl ExitGate {
    pub fn new(is_operational: bool) -> Self {
        Self {
            id: GateId::new(),
            operational: OperationalFlag::new(is_operational),
            clock: system_clock(),
            schedule: FeeSchedule,
        }
    }

    /// Use `clock` for exit timestamps.
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn is_operational(&self) -> bool {
        self.operational.get()
    }

    pub fn set_operational(&self, is_operational: bool) {
        self.operational.set(is_operational);
        info!(gate_id = %self.id, is_operational, "Exit gate status changed");
    }

    fn validate(&self, ticket: &Ticket) -> ParkingResult<()> {
        if ticket.is_paid() {
            return Err(ParkingError::AlreadyPaid(ticket.id().to_string()));
        }
        if ticket.exit_time().is_some() {
            return Err(ParkingError::AlreadyExited(ticket.id().to_string()));
        }
        Ok(())
    }

    /// Settle `ticket` and free its spot.
    ///
    /// The stay is billed in whole hours rounded half-up. The spot is released
    /// first (only if the ticket's vehicle still holds it); the ticket is
    /// stamped with exit time, price and payment only once that succeeded, so
    /// a rejected exit leaves both the ticket and the spot unchanged.
    pub fn register_exit<'t>(&self, ticket: &'t mut Ticket) -> ParkingResult<&'t Ticket> {
        if let Err(e) = self.validate(ticket) {
            warn!(gate_id = %self.id, ticket_id = %ticket.id(), error = %e, "Exit rejected");
            return Err(e);
        }

        let exit_time = self.clock.now();
        let hours = billable_hours(ticket.entry_time(), exit_time);
        let fee = self.schedule.quote(ticket.vehicle().class(), hours);

        ticket.spot().release_vehicle(ticket.vehicle().id())?;
        ticket.complete(exit_time, fee);

        info!(
            gate_id = %self.id,
            ticket_id = %ticket.id(),
            spot = %ticket.spot_label(),
            hours,
            price = fee.total,
            "Vehicle exit registered"
        );

        Ok(&*ticket)
    }
}

impl Default for ExitGate {
    fn default() -> Self {
        Self::new(true)
    }
}

// ── Tests ──────────────────────────────────────────────────────
