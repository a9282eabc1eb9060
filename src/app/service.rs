//! Application service: the hexagonal core.
//!
//! [`ControlService`] owns the coverage estimator, the live thresholds,
//! the actuator state store and the driver.  Every method takes `&self`
//! so one instance can be shared across request threads.
//!
//! ```text
//!  frame ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  pH?   ──▶ │        ControlService        │
//!            │ estimate · valve · pH policy │ ──▶ ActuatorPort
//!            └──────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use image::RgbImage;
use log::{info, warn};
use serde::Serialize;

use crate::config::{ControlConfig, validate_close_threshold};
use crate::control::{PhThresholds, decide_ph_active, decide_valve_closed};
use crate::drivers::{Actuator, RelayWiring};
use crate::error::{ConfigError, Result};
use crate::sensors;
use crate::state::{ActuatorState, ActuatorStateStore};
use crate::vision::{CoverageEstimator, EstimatorMode};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, PhSensorPort};

// ───────────────────────────────────────────────────────────────
// Reports
// ───────────────────────────────────────────────────────────────

/// Flat result of one analysed frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Rounded to two decimal places.
    pub coverage_pct: f64,
    pub mode: EstimatorMode,
    pub threshold: f64,
    pub valve_closed: bool,
    pub valve_applied: bool,
    pub ph_adjustment_active: bool,
    pub ph_applied: bool,
    /// The reading that was used, after sanitising.
    pub ph_reading: Option<f32>,
    pub ph_threshold_low: f64,
    pub ph_threshold_high: f64,
}

/// Current state without analysing a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub ok: bool,
    pub mode: EstimatorMode,
    pub threshold: f64,
    pub ph_threshold_low: f64,
    pub ph_threshold_high: f64,
    pub target_ph_min: f32,
    pub target_ph_max: f32,
    pub weights_present: bool,
    pub weights_path: PathBuf,
    pub driver_available: bool,
    pub wiring: RelayWiring,
    pub valve_closed: ActuatorState,
    pub valve_applied: bool,
    pub ph_adjustment_active: ActuatorState,
    pub ph_applied: bool,
}

/// Result of a manual command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutcome {
    Actuated {
        actuator: Actuator,
        engaged: bool,
        applied: bool,
    },
    ThresholdSet {
        threshold: f64,
    },
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService<D: ActuatorPort> {
    estimator: CoverageEstimator,
    config: RwLock<ControlConfig>,
    store: ActuatorStateStore,
    driver: Mutex<D>,
    wiring: RelayWiring,
}

impl<D: ActuatorPort> ControlService<D> {
    /// Build the service.  Rejects an inconsistent threshold set.
    pub fn new(
        estimator: CoverageEstimator,
        config: ControlConfig,
        driver: D,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        if !driver.is_available() {
            warn!("No actuator driver available; commands will be recorded but not applied");
        }
        info!(
            "ControlService ready: mode={} threshold={}% pH band={}..{}%",
            estimator.mode().name(),
            config.close_threshold,
            config.ph_low,
            config.ph_high
        );
        Ok(Self {
            estimator,
            config: RwLock::new(config),
            store: ActuatorStateStore::new(),
            driver: Mutex::new(driver),
            wiring: RelayWiring::default(),
        })
    }

    /// Record the relay wiring the driver was built for, so status
    /// reports show it.
    pub fn with_wiring(mut self, wiring: RelayWiring) -> Self {
        self.wiring = wiring;
        self
    }

    // ── Per-frame pipeline ────────────────────────────────────

    /// Estimate coverage and drive both actuators.
    ///
    /// `ph_reading` overrides the coverage hysteresis for the pH relay when
    /// present.  Non-finite or out-of-scale readings count as absent.
    pub fn analyze(
        &self,
        frame: &RgbImage,
        ph_reading: Option<f32>,
        sink: &mut impl EventSink,
    ) -> Result<AnalysisReport> {
        let coverage = self.estimator.estimate(frame)?;
        let cfg = self.config();
        let ph_reading = sensors::sanitize(ph_reading);
        let coverage_pct = coverage.rounded();
        let mode = self.estimator.mode();

        sink.emit(&AppEvent::Analyzed {
            mode,
            coverage_pct,
            ph_reading,
        });

        let valve_target = decide_valve_closed(coverage_pct, cfg.close_threshold);
        let (valve_closed, valve_applied) =
            self.actuate(Actuator::InletValve, |_| valve_target, false, sink);

        let thresholds = PhThresholds::from(&cfg);
        let (ph_active, ph_applied) = self.actuate(
            Actuator::PhRelay,
            |current| decide_ph_active(coverage.percent(), ph_reading, &thresholds, current),
            false,
            sink,
        );

        info!(
            "{} analysis: {:.2}% coverage, valve={}, pH adjustment={}",
            mode.name(),
            coverage_pct,
            if valve_closed { "closed" } else { "open" },
            if ph_active { "active" } else { "inactive" },
        );

        Ok(AnalysisReport {
            coverage_pct,
            mode,
            threshold: cfg.close_threshold,
            valve_closed,
            valve_applied,
            ph_adjustment_active: ph_active,
            ph_applied,
            ph_reading,
            ph_threshold_low: cfg.ph_low,
            ph_threshold_high: cfg.ph_high,
        })
    }

    /// [`analyze`](Self::analyze) with the reading pulled from a sensor port.
    pub fn analyze_with_sensor(
        &self,
        frame: &RgbImage,
        sensor: &mut (impl PhSensorPort + ?Sized),
        sink: &mut impl EventSink,
    ) -> Result<AnalysisReport> {
        let reading = sensor.read_ph();
        self.analyze(frame, reading, sink)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a manual override.
    pub fn handle_command(
        &self,
        cmd: AppCommand,
        sink: &mut impl EventSink,
    ) -> core::result::Result<CommandOutcome, ConfigError> {
        match cmd {
            AppCommand::SetValve(closed) => Ok(self.force(Actuator::InletValve, closed, sink)),
            AppCommand::SetPhAdjustment(active) => Ok(self.force(Actuator::PhRelay, active, sink)),
            AppCommand::SetCloseThreshold(value) => self
                .set_close_threshold(value, sink)
                .map(|threshold| CommandOutcome::ThresholdSet { threshold }),
        }
    }

    /// Replace the valve close threshold.  On rejection the previous value
    /// is kept and returned inside the event.
    pub fn set_close_threshold(
        &self,
        value: f64,
        sink: &mut impl EventSink,
    ) -> core::result::Result<f64, ConfigError> {
        let mut cfg = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let previous = cfg.close_threshold;
        if let Err(e) = validate_close_threshold(value) {
            drop(cfg);
            warn!("Rejected close threshold {} ({}), keeping {}", value, e, previous);
            sink.emit(&AppEvent::ThresholdRejected {
                requested: value,
                kept: previous,
            });
            return Err(e);
        }
        cfg.close_threshold = value;
        drop(cfg);
        info!("Close threshold updated {}% -> {}%", previous, value);
        sink.emit(&AppEvent::ThresholdUpdated {
            from: previous,
            to: value,
        });
        Ok(value)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> StatusReport {
        let cfg = self.config();
        let valve = self.store.record(Actuator::InletValve);
        let ph = self.store.record(Actuator::PhRelay);
        StatusReport {
            ok: true,
            mode: self.estimator.mode(),
            threshold: cfg.close_threshold,
            ph_threshold_low: cfg.ph_low,
            ph_threshold_high: cfg.ph_high,
            target_ph_min: cfg.target_ph_min,
            target_ph_max: cfg.target_ph_max,
            weights_present: self.estimator.weights_present(),
            weights_path: self.estimator.weights_path().to_path_buf(),
            driver_available: self.driver().is_available(),
            wiring: self.wiring,
            valve_closed: valve.desired,
            valve_applied: valve.applied,
            ph_adjustment_active: ph.desired,
            ph_applied: ph.applied,
        }
    }

    /// Snapshot of the live thresholds.
    pub fn config(&self) -> ControlConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> EstimatorMode {
        self.estimator.mode()
    }

    pub fn actuator_state(&self, actuator: Actuator) -> ActuatorState {
        self.store.state(actuator)
    }

    // ── Internal ──────────────────────────────────────────────

    fn force(&self, actuator: Actuator, engaged: bool, sink: &mut impl EventSink) -> CommandOutcome {
        let (engaged, applied) = self.actuate(actuator, |_| engaged, true, sink);
        CommandOutcome::Actuated {
            actuator,
            engaged,
            applied,
        }
    }

    /// Read the held state, decide, drive, and record, all under the
    /// actuator's slot lock.  Lock order: store slot, then driver.
    fn actuate(
        &self,
        actuator: Actuator,
        decide: impl FnOnce(ActuatorState) -> bool,
        manual: bool,
        sink: &mut impl EventSink,
    ) -> (bool, bool) {
        let mut slot = self.store.lock(actuator);
        let previous = slot.state();
        let desired = decide(previous);
        let applied = self.driver().apply_state(actuator, desired);
        slot.commit(desired, applied);
        drop(slot);

        if !previous.is_known() {
            info!("{} first set {}", actuator, describe(actuator, desired));
        } else if previous != ActuatorState::from_engaged(desired) {
            info!("{} -> {}", actuator, describe(actuator, desired));
        }
        sink.emit(&AppEvent::Commanded {
            actuator,
            engaged: desired,
            applied,
            manual,
        });
        (desired, applied)
    }

    fn driver(&self) -> MutexGuard<'_, D> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn describe(actuator: Actuator, engaged: bool) -> &'static str {
    match (actuator, engaged) {
        (Actuator::InletValve, true) => "CLOSED",
        (Actuator::InletValve, false) => "OPEN",
        (Actuator::PhRelay, true) => "ACTIVE",
        (Actuator::PhRelay, false) => "INACTIVE",
    }
}
