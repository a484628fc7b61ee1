//! MapRoute CLI
//!
//! Command-line front end for the location & route coordination core.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use application::{CancellationSource, CoreEvent, EventKind, MapCore};
use clap::{Parser, Subcommand};
use domain::{AuthorizationState, LocationFix};
use infrastructure::config::GeoLocationConfig;
use infrastructure::{AppConfig, build_core, init_logging};
use tokio::sync::mpsc;
use tracing::debug;

/// MapRoute CLI
#[derive(Parser)]
#[command(name = "maproute-cli")]
#[command(author, version, about = "MapRoute location and routing CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "MAPROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Device location override as "lat,lon"
    #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
    at: Option<GeoLocationConfig>,

    /// Seconds to wait for the first location fix
    #[arg(long, default_value = "10")]
    fix_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for location access and print the first fix
    Locate,

    /// Resolve an address to coordinates
    Geocode {
        /// Free-text address
        address: String,
    },

    /// Plan a driving route from the current location to an address
    ///
    /// Example: maproute-cli --at 51.5,-0.12 route "Paris"
    Route {
        /// Destination address
        address: String,
    },

    /// List the visited places pinned on the map
    Pins,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a "lat,lon" pair
fn parse_location(value: &str) -> Result<GeoLocationConfig, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{value}\""))?;
    let location = GeoLocationConfig {
        latitude: lat.trim().parse().map_err(|e| format!("latitude: {e}"))?,
        longitude: lon.trim().parse().map_err(|e| format!("longitude: {e}"))?,
    };
    if location.to_coordinate().is_none() {
        return Err(format!("\"{value}\" is out of range"));
    }
    Ok(location)
}

/// Start the core and wait until the permission flow settles
async fn locate(
    core: &MapCore,
    changes: mpsc::UnboundedReceiver<AuthorizationState>,
    wait: Duration,
) -> anyhow::Result<LocationFix> {
    let events = core.events();
    let (updated_id, mut updated) = events.subscribe_channel(EventKind::LocationUpdated);
    let (denied_id, mut denied) = events.subscribe_channel(EventKind::AccessDenied);
    let (failed_id, mut failed) = events.subscribe_channel(EventKind::LocationFailed);
    let _task = core.start(changes);

    let outcome = tokio::time::timeout(wait, async {
        tokio::select! {
            Some(event) = updated.recv() => Ok(event),
            Some(event) = denied.recv() => Ok(event),
            Some(event) = failed.recv() => Ok(event),
            else => Err(anyhow::anyhow!("event bus closed")),
        }
    })
    .await;

    for id in [updated_id, denied_id, failed_id] {
        events.unsubscribe(id);
    }

    match outcome.context("timed out waiting for a location fix")?? {
        CoreEvent::LocationUpdated(fix) => Ok(fix),
        CoreEvent::AccessDenied => bail!("location access denied"),
        CoreEvent::LocationFailed { description } => bail!("location unavailable: {description}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    if cli.verbose > 0 {
        config.telemetry.log_filter = log_filter_from_verbosity(cli.verbose).to_string();
    }
    if let Some(location) = cli.at {
        config.device.location = Some(location);
    }
    init_logging(&config.telemetry)?;
    debug!(config = ?cli.config, "Configuration loaded");

    let bootstrapped = build_core(&config)?;
    let core = bootstrapped.core;
    let changes = bootstrapped.authorization_changes;
    let wait = Duration::from_secs(cli.fix_timeout);

    match cli.command {
        Commands::Locate => {
            let fix = locate(&core, changes, wait).await?;
            println!("📍 You are at {}", fix.coordinate());
            println!("   State: {}", core.permission().state());
        },

        Commands::Geocode { address } => {
            let coordinate = core.geocoding().resolve(&address).await?;
            println!("🔎 {address} → {coordinate}");
        },

        Commands::Route { address } => {
            let fix = locate(&core, changes, wait).await?;
            println!("📍 From {}", fix.coordinate());

            let cancel = CancellationSource::new();
            let planned = tokio::select! {
                result = core.routes().create_route(&address, cancel.token()) => result?,
                _ = tokio::signal::ctrl_c() => {
                    cancel.cancel();
                    bail!("route planning interrupted");
                },
            };

            println!("🏁 To {address} ({})", planned.request.destination);
            println!("🚗 Distance: {} km", planned.route.format_distance());
            let direct = planned.request.origin.distance_meters(&planned.request.destination);
            println!("   Straight line: {:.0} km", direct / 1000.0);
            if let Some(secs) = planned.route.expected_travel_time_secs() {
                println!("⏱️  Travel time: {} min", (secs / 60.0).round());
            }
            println!("   {} points in route geometry", planned.route.geometry().len());
        },

        Commands::Pins => {
            core.pins().seed_visited_places();
            for pin in core.pins().pins() {
                println!("📌 {} ({})", pin.title, pin.coordinate);
                if let Some(info) = &pin.info {
                    println!("   {info}");
                }
            }
        },
    }

    Ok(())
}
