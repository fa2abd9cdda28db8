//! Ticket DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::tariff::FeeBreakdown;
use crate::domain::ticket::{Ticket, TicketStatus};
use crate::domain::vehicle::VehicleClass;

/// Read-only rendering of a ticket for display and JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketView {
    pub ticket_id: String,
    pub vehicle_id: String,
    pub class: VehicleClass,
    pub registration: String,
    pub floor_level: u32,
    pub spot_label: String,
    pub entry_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<FeeBreakdown>,
    pub is_paid: bool,
    pub status: TicketStatus,
}

impl From<&Ticket> for TicketView {
    fn from(t: &Ticket) -> Self {
        Self {
            ticket_id: t.id().to_string(),
            vehicle_id: t.vehicle().id().to_string(),
            class: t.vehicle().class(),
            registration: t.vehicle().registration().to_string(),
            floor_level: t.floor().level(),
            spot_label: t.spot_label().to_string(),
            entry_time: t.entry_time(),
            exit_time: t.exit_time(),
            price: t.price(),
            fee: t.fee().copied(),
            is_paid: t.is_paid(),
            status: t.status(),
        }
    }
}
