//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/parking-facility/config.toml`).
//! Every section falls back to its defaults, so a partial file is enough.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [facility]
//! floors = 3
//! entry_gates = 2
//!
//! [facility.spots_per_floor]
//! lmv = 12
//! ev = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::VehicleClass;
use crate::shared::errors::ConfigError;

/// Highest floor count that still gets a label letter (A to Z)
pub const MAX_FLOORS: u32 = 26;

/// Upper bound on spots laid out on a single floor
pub const MAX_SPOTS_PER_FLOOR: u64 = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub facility: FacilityConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`. `RUST_LOG` wins if set.
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Physical layout of the facility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    pub floors: u32,
    pub spots_per_floor: SpotsPerClass,
    pub entry_gates: u32,
    pub exit_gates: u32,
    /// Whether the facility accepts traffic right after startup
    pub open: bool,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            floors: 4,
            spots_per_floor: SpotsPerClass::default(),
            entry_gates: 1,
            exit_gates: 1,
            open: true,
        }
    }
}

/// Spot count per vehicle class on each floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotsPerClass {
    pub lmv: u32,
    pub tw: u32,
    pub hmv: u32,
    pub ev: u32,
}

impl SpotsPerClass {
    pub fn count(&self, class: VehicleClass) -> u32 {
        match class {
            VehicleClass::LightMotorVehicle => self.lmv,
            VehicleClass::TwoWheeler => self.tw,
            VehicleClass::HeavyMotorVehicle => self.hmv,
            VehicleClass::ElectricVehicle => self.ev,
        }
    }

    /// Summed as `u64` so no combination of class counts can overflow.
    pub fn total(&self) -> u64 {
        VehicleClass::ALL
            .iter()
            .map(|c| u64::from(self.count(*c)))
            .sum()
    }
}

impl Default for SpotsPerClass {
    fn default() -> Self {
        Self {
            lmv: 20,
            tw: 10,
            hmv: 10,
            ev: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let facility = &self.facility;
        if facility.floors == 0 {
            return Err(ConfigError::Invalid("facility.floors must be at least 1".into()));
        }
        if facility.floors > MAX_FLOORS {
            return Err(ConfigError::Invalid(format!(
                "facility.floors must be at most {} (one letter per floor)",
                MAX_FLOORS
            )));
        }
        if facility.entry_gates == 0 {
            return Err(ConfigError::Invalid(
                "facility.entry_gates must be at least 1".into(),
            ));
        }
        if facility.exit_gates == 0 {
            return Err(ConfigError::Invalid(
                "facility.exit_gates must be at least 1".into(),
            ));
        }
        let spots = facility.spots_per_floor.total();
        if spots == 0 {
            return Err(ConfigError::Invalid(
                "facility.spots_per_floor has no spots".into(),
            ));
        }
        if spots > MAX_SPOTS_PER_FLOOR {
            return Err(ConfigError::Invalid(format!(
                "facility.spots_per_floor totals {}, at most {} allowed",
                spots, MAX_SPOTS_PER_FLOOR
            )));
        }
        if self.events.capacity == 0 {
            return Err(ConfigError::Invalid("events.capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// `<config dir>/parking-facility/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("parking-facility").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

// ── Tests ──────────────────────────────────────────────────────
