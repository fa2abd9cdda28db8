use thiserror::Error;

use crate::domain::VehicleClass;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkingError {
    #[error("Invalid vehicle: {0}")]
    InvalidVehicle(String),

    #[error("No available parking spot for vehicle type: {class}")]
    NoSpotAvailable { class: VehicleClass },

    #[error("No parking floor available for {class}")]
    NoFloorAvailable { class: VehicleClass },

    #[error("Parking spot {spot} already occupied")]
    AlreadyOccupied { spot: String },

    #[error("Parking spot {spot} already empty")]
    AlreadyEmpty { spot: String },

    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("Ticket {0} already paid")]
    AlreadyPaid(String),

    #[error("Ticket {0} already exited")]
    AlreadyExited(String),

    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    #[error("No {0} gate available")]
    NoGateAvailable(GateKind),

    #[error("Parking facility {0} is closed")]
    FacilityClosed(String),

    #[error("Ticket could not be issued: {0}")]
    TicketIssue(String),
}

impl ParkingError {
    /// Whether a retry against a different candidate could succeed.
    /// Only a lost race for a spot qualifies.
    pub fn is_contention(&self) -> bool {
        matches!(self, ParkingError::AlreadyOccupied { .. })
    }
}

/// Gate direction, used in `NoGateAvailable` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Entry,
    Exit,
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// Result type for parking operations
pub type ParkingResult<T> = Result<T, ParkingError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failure of a whole simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parking(#[from] ParkingError),

    #[error("Simulation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// ── Tests ──────────────────────────────────────────────────────
