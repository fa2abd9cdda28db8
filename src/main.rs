//! Parking facility simulation
//!
//! Runs the default entry/exit simulation with the configuration found at
//! `PARKING_CONFIG` or `~/.config/parking-facility/config.toml`. See the
//! `parking-sim` CLI for flags.

use tracing::{error, info};

use parking_facility::simulation::{init_tracing, run, SimulationOptions};
use parking_facility::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let report = run(SimulationOptions {
        config,
        ..SimulationOptions::default()
    })
    .await?;

    for ticket in &report.completed {
        info!(
            spot = %ticket.spot_label,
            registration = %ticket.registration,
            price = ?ticket.price,
            "Vehicle exited"
        );
    }
    info!(revenue = report.revenue, "Parking simulation completed");

    Ok(())
}
