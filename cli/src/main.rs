//! Parking facility simulation CLI
//!
//! Builds a facility from config, parks a batch of vehicles concurrently,
//! fast-forwards time and processes every exit.
//!
//! ```sh
//! # Run with default config (~/.config/parking-facility/config.toml)
//! parking-sim
//!
//! # Custom vehicles and stay length
//! parking-sim --vehicles LMV:KA01AB1234 --vehicles EV:KA02EV0001 --hours 6
//!
//! # Machine-readable report
//! parking-sim --json
//!
//! # Validate config without running
//! parking-sim --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use parking_facility::config::AppConfig;
use parking_facility::simulation::{init_tracing, run, SimulationOptions, SimulationReport};
use parking_facility::{Vehicle, VehicleClass};

/// Parking facility simulation.
#[derive(Parser, Debug)]
#[command(
    name = "parking-sim",
    version,
    about = "Simulate concurrent entries and exits at a parking facility",
    long_about = "Builds a facility from the configured layout, parks the given vehicles \
                  concurrently, advances the clock and settles every ticket.\n\n\
                  Default config: ~/.config/parking-facility/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Hours every vehicle stays parked.
    #[arg(long, default_value_t = 3)]
    hours: u32,

    /// Vehicle as CLASS:REGISTRATION (e.g. TW:KA01CD5678). Repeatable.
    #[arg(long = "vehicles", value_name = "CLASS:REG", value_parser = parse_vehicle)]
    vehicles: Vec<Vehicle>,

    /// Print the report as JSON instead of printed tickets.
    #[arg(long)]
    json: bool,

    /// Validate the configuration file and exit without running.
    #[arg(long)]
    check: bool,
}

fn parse_vehicle(raw: &str) -> Result<Vehicle, String> {
    let (class, registration) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected CLASS:REG, got '{}'", raw))?;
    let class: VehicleClass = class.trim().parse().map_err(|e| format!("{}", e))?;
    let vehicle = Vehicle::new(class, registration.trim());
    vehicle.validate().map_err(|e| e.to_string())?;
    Ok(vehicle)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(parking_facility::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli.check {
                eprintln!("Configuration is invalid: {}", e);
                std::process::exit(1);
            }
            let cfg = AppConfig::default();
            init_logging(&cfg, cli.log_level.as_deref());
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            return simulate(&cli, cfg).await;
        }
    };

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        let facility = &config.facility;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Floors      : {}", facility.floors);
        println!("   Spots/floor : {}", facility.spots_per_floor.total());
        println!(
            "   Gates       : {} entry, {} exit",
            facility.entry_gates, facility.exit_gates
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    simulate(&cli, config).await
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let mut config = config.clone();
    if let Some(level) = level {
        config.logging.level = level.to_string();
    }
    init_tracing(&config);
}

async fn simulate(cli: &Cli, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut opts = SimulationOptions {
        config,
        parked_hours: cli.hours,
        ..SimulationOptions::default()
    };
    if !cli.vehicles.is_empty() {
        opts.vehicles = cli.vehicles.clone();
    }

    let report = run(opts).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Parking tickets issued -");
    for ticket in &report.issued {
        print_ticket(ticket);
    }
    for rejected in &report.rejected {
        println!(
            "Vehicle {} ({}) turned away: {}",
            rejected.registration, rejected.class, rejected.reason
        );
    }

    println!("\nFinal tickets after payment -");
    for ticket in &report.completed {
        print_ticket(ticket);
    }
    println!(
        "\nRevenue: {}  |  Free spots: {}/{}",
        report.revenue,
        report.occupancy_after_exit.free(),
        report.occupancy_after_exit.total()
    );
}

fn print_ticket(t: &parking_facility::TicketView) {
    println!("------------------------------------");
    println!("Ticket ID: {}", t.ticket_id);
    println!("Vehicle Type: {}", t.class);
    println!("Registration Number: {}", t.registration);
    println!("Parking Spot: {}", t.spot_label);
    println!("Entry Time: {}", t.entry_time.format("%Y-%m-%d %H:%M:%S"));
    match t.exit_time {
        Some(exit) => println!("Exit Time: {}", exit.format("%Y-%m-%d %H:%M:%S")),
        None => println!("Exit Time: -"),
    }
    match t.price {
        Some(price) => println!("Price: {}", price),
        None => println!("Price: -"),
    }
    println!("Paid: {}", if t.is_paid { "Yes" } else { "No" });
}
