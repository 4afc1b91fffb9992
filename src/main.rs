//! # AIDA64 Sensor Bridge CLI
//!
//! Demonstration host for the bridge library: loads the sensor set
//! once, then refreshes on an interval and prints current values.
//!
//! # Usage
//!
//! ```bash
//! # Poll the default segment once per second
//! aida_bridge
//!
//! # One snapshot, then exit
//! aida_bridge --once
//!
//! # Custom segment and interval, verbose logging
//! aida_bridge --segment MySegment --interval-ms 250 -v
//!
//! # Config file
//! aida_bridge --config bridge.toml
//! ```

#![deny(warnings)]

use aida_bridge::{
    BridgeConfig, CycleStatus, SensorBridge, SensorContainer, SharedMemorySource,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

/// AIDA64 sensor bridge - republish shared-memory telemetry as named sensor values
#[derive(Parser, Debug)]
#[command(name = "aida_bridge")]
#[command(version)]
#[command(about = "Republishes AIDA64 shared-memory telemetry as named sensor values")]
struct Args {
    /// Path to bridge configuration file (bridge.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Shared memory segment name (overrides config)
    #[arg(long)]
    segment: Option<String>,

    /// Refresh interval in milliseconds (overrides config)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Load and print one snapshot, then exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("aida_bridge failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args);

    let mut config = match &args.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(segment) = &args.segment {
        config.segment_name = segment.clone();
    }
    if let Some(interval) = args.interval_ms {
        config.poll_interval_ms = interval;
    }
    config.validate()?;

    info!(
        "aida_bridge v{} starting (segment: {})",
        env!("CARGO_PKG_VERSION"),
        config.segment_name
    );

    let source = SharedMemorySource::new(&config.segment_name);
    let mut bridge = SensorBridge::new(source);
    let mut container = SensorContainer::new();

    match bridge.load(&mut container) {
        CycleStatus::Completed { count } => info!("Tracking {count} sensors"),
        status => warn!("No sensors registered this cycle: {status:?}"),
    }
    print_sensors(&container);

    if args.once {
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        handler_flag.store(false, Ordering::SeqCst);
    })?;

    let interval = Duration::from_millis(config.poll_interval_ms);
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(interval);
        if !running.load(Ordering::SeqCst) {
            break;
        }
        match bridge.refresh() {
            CycleStatus::Completed { count } => {
                info!("Refreshed {count} sensors");
                print_sensors(&container);
            }
            status => warn!("Refresh skipped: {status:?}"),
        }
    }

    bridge.shutdown();
    info!("aida_bridge shutdown complete");
    Ok(())
}

/// Print current values for every registered sensor.
fn print_sensors(container: &SensorContainer) {
    for sensor in container.iter() {
        info!(
            "{:>10.1}  {}  ({})",
            sensor.value(),
            sensor.name(),
            sensor.id()
        );
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
