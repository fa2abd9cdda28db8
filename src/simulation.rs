//! Reusable parking simulation runtime.
//!
//! Builds a facility from [`AppConfig`], parks a batch of vehicles
//! concurrently, fast-forwards a manual clock, then exits every parked
//! vehicle concurrently. Both the CLI and the root binary drive this.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::dto::TicketView;
use crate::application::events::create_event_bus;
use crate::application::layout::build_facility;
use crate::config::AppConfig;
use crate::domain::facility::OccupancyReport;
use crate::domain::ticket::Ticket;
use crate::domain::vehicle::{Vehicle, VehicleClass};
use crate::shared::clock::ManualClock;
use crate::shared::errors::SimulationError;

// ── Options ────────────────────────────────────────────────────────

/// Options for one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub config: AppConfig,
    /// Vehicles arriving at once, in arrival order.
    pub vehicles: Vec<Vehicle>,
    /// How long every vehicle stays before exiting.
    pub parked_hours: u32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            vehicles: default_vehicles(),
            parked_hours: 3,
        }
    }
}

/// One car, one two-wheeler and one truck.
pub fn default_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::new(VehicleClass::LightMotorVehicle, "KA01AB1234"),
        Vehicle::new(VehicleClass::TwoWheeler, "KA01CD5678"),
        Vehicle::new(VehicleClass::HeavyMotorVehicle, "KA01EF9012"),
    ]
}

// ── Report ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RejectedEntry {
    pub registration: String,
    pub class: VehicleClass,
    pub reason: String,
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Tickets as issued at entry
    pub issued: Vec<TicketView>,
    /// The same tickets after exit and payment
    pub completed: Vec<TicketView>,
    pub rejected: Vec<RejectedEntry>,
    /// Sum of all collected fees
    pub revenue: i64,
    pub occupancy_after_entry: OccupancyReport,
    pub occupancy_after_exit: OccupancyReport,
    pub events_published: usize,
}

// ── Run ────────────────────────────────────────────────────────────

pub async fn run(opts: SimulationOptions) -> Result<SimulationReport, SimulationError> {
    opts.config.validate()?;

    let clock = Arc::new(ManualClock::starting_now());
    let bus = create_event_bus(opts.config.events.capacity);
    let mut subscriber = bus.subscribe();
    let facility = Arc::new(
        build_facility(&opts.config.facility, clock.clone())?.with_events(bus.clone()),
    );

    info!(vehicles = opts.vehicles.len(), "Simulating concurrent vehicle entries");

    let entries: Vec<_> = opts
        .vehicles
        .into_iter()
        .map(|vehicle| {
            let facility = facility.clone();
            tokio::task::spawn_blocking(move || {
                let result = facility.park_vehicle(&vehicle);
                (vehicle, result)
            })
        })
        .collect();

    let mut tickets: Vec<Ticket> = Vec::new();
    let mut rejected = Vec::new();
    for entry in entries {
        let (vehicle, result) = entry.await?;
        match result {
            Ok(ticket) => tickets.push(ticket),
            Err(e) => rejected.push(RejectedEntry {
                registration: vehicle.registration().to_string(),
                class: vehicle.class(),
                reason: e.to_string(),
            }),
        }
    }

    let issued: Vec<TicketView> = tickets.iter().map(TicketView::from).collect();
    let occupancy_after_entry = facility.occupancy();

    info!(
        parked = tickets.len(),
        rejected = rejected.len(),
        hours = opts.parked_hours,
        "Fast-forwarding parked vehicles"
    );
    clock.advance(Duration::hours(i64::from(opts.parked_hours)));

    let exits: Vec<_> = tickets
        .into_iter()
        .map(|mut ticket| {
            let facility = facility.clone();
            tokio::task::spawn_blocking(move || {
                let result = facility.process_exit(&mut ticket).map(|_| ());
                (ticket, result)
            })
        })
        .collect();

    let mut completed = Vec::with_capacity(exits.len());
    for exit in exits {
        let (ticket, result) = exit.await?;
        if let Err(e) = result {
            warn!(ticket_id = %ticket.id(), error = %e, "Exit failed");
            return Err(e.into());
        }
        completed.push(TicketView::from(&ticket));
    }

    let revenue: i64 = completed.iter().filter_map(|t| t.price).sum();
    let occupancy_after_exit = facility.occupancy();

    let mut events_published: usize = 0;
    while subscriber.try_recv().is_some() {
        events_published += 1;
    }

    info!(
        exited = completed.len(),
        revenue,
        events = events_published,
        "Simulation completed"
    );

    Ok(SimulationReport {
        issued,
        completed,
        rejected,
        revenue,
        occupancy_after_entry,
        occupancy_after_exit,
        events_published,
    })
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup. `RUST_LOG` overrides the configured
/// level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
