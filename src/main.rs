//! Duckweed controller: command-line entry point.
//!
//! Analyses camera frames in order through one [`ControlService`], so the
//! pH hysteresis carries from frame to frame, and prints one JSON report
//! per frame followed by a final status line.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Adapters                                            │
//! │  EnvConfig / FileConfig   LogEventSink   NullDriver  │
//! │  ─────────────── Port Trait Boundary ──────────────  │
//! │  ControlService: estimator · valve · pH · store      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! No relay HAL is linked into this binary; it always runs headless.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use duckweed::adapters::env_config::EnvConfig;
use duckweed::adapters::file_config::FileConfig;
use duckweed::adapters::log_sink::LogEventSink;
use duckweed::app::commands::AppCommand;
use duckweed::app::ports::{ConfigPort, PhSensorPort};
use duckweed::app::service::ControlService;
use duckweed::drivers::NullDriver;
use duckweed::sensors::{FixedPhReading, NoPhSensor};
use duckweed::vision::CoverageEstimator;
use duckweed::vision::io::load_frame;

#[derive(Parser, Debug)]
#[command(name = "duckweed", version, about = "Duckweed coverage and actuator control")]
struct Args {
    /// JSON config file; environment variables are used when omitted
    #[arg(long, env = "DUCKWEED_CONFIG")]
    config: Option<PathBuf>,

    /// Measured pH applied to every frame
    #[arg(long)]
    ph: Option<f32>,

    /// Valve close threshold override (0-100)
    #[arg(long)]
    threshold: Option<f64>,

    /// Frames to analyse, in order
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("duckweed v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config ─────────────────────────────────────────────
    let config = match &args.config {
        Some(path) => FileConfig::new(path).load(),
        None => EnvConfig::from_process().load(),
    }
    .context("loading configuration")?;

    // ── 2. Strategy and driver, resolved once ─────────────────
    let estimator = CoverageEstimator::select(&config.weights_path, None);
    let wiring = config.wiring();
    info!("Relay wiring {} (not driven, headless)", wiring);
    let service = ControlService::new(estimator, config.control, NullDriver::new())
        .context("building control service")?
        .with_wiring(wiring);
    let mut sink = LogEventSink::new();

    if let Some(t) = args.threshold {
        if let Err(e) = service.handle_command(AppCommand::SetCloseThreshold(t), &mut sink) {
            warn!(
                "--threshold {} ignored ({}), using {}%",
                t,
                e,
                service.config().close_threshold
            );
        }
    }

    let mut sensor: Box<dyn PhSensorPort> = match args.ph {
        Some(v) => Box::new(FixedPhReading(v)),
        None => Box::new(NoPhSensor),
    };

    // ── 3. Frames ─────────────────────────────────────────────
    for path in &args.images {
        let frame = match load_frame(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let report = service
            .analyze_with_sensor(&frame, sensor.as_mut(), &mut sink)
            .with_context(|| format!("analysing {}", path.display()))?;
        println!("{}", serde_json::to_string(&report)?);
    }

    println!("{}", serde_json::to_string(&service.status())?);
    Ok(())
}
