//! System configuration parameters
//!
//! All tunable parameters for the duckweed controller.
//! Values are loaded once at startup through a [`ConfigPort`](crate::app::ports::ConfigPort)
//! adapter; only the valve close threshold may change afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::drivers::{Polarity, RelayWiring};
use crate::error::ConfigError;
use crate::pins;

/// Thresholds consumed by the valve and pH policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    // --- Inlet valve ---
    /// Coverage (%) at or above which the inlet valve closes
    pub close_threshold: f64,

    // --- pH relay, coverage hysteresis ---
    /// Coverage (%) at or below which pH adjustment activates
    pub ph_low: f64,
    /// Coverage (%) at or above which pH adjustment deactivates
    pub ph_high: f64,

    // --- pH relay, sensor band ---
    /// Lowest acceptable measured pH
    pub target_ph_min: f32,
    /// Highest acceptable measured pH
    pub target_ph_max: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            close_threshold: 40.0,
            ph_low: 30.0,
            ph_high: 70.0,
            target_ph_min: 6.5,
            target_ph_max: 7.5,
        }
    }
}

impl ControlConfig {
    /// Check every range and ordering invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coverage = [self.close_threshold, self.ph_low, self.ph_high];
        let ph = [self.target_ph_min, self.target_ph_max];
        if coverage.iter().any(|v| !v.is_finite()) || ph.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        validate_close_threshold(self.close_threshold)?;
        if self.ph_low >= self.ph_high {
            return Err(ConfigError::ValidationFailed("ph_low must be below ph_high"));
        }
        if self.target_ph_min >= self.target_ph_max {
            return Err(ConfigError::ValidationFailed(
                "target_ph_min must be below target_ph_max",
            ));
        }
        Ok(())
    }
}

/// Range check shared by startup validation and the runtime override.
pub fn validate_close_threshold(value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::ValidationFailed(
            "close_threshold must be within 0..=100",
        ));
    }
    Ok(())
}

/// Everything resolved at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    #[serde(flatten)]
    pub control: ControlConfig,

    // --- Segmentation model ---
    /// Weight artifact; the model strategy is used only if this exists
    pub weights_path: PathBuf,

    // --- Relay wiring ---
    /// Relays energise on a LOW pin level
    pub active_low: bool,
    /// BCM pin of the inlet valve relay
    pub valve_pin: u8,
    /// BCM pin of the pH relay
    pub ph_relay_pin: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            control: ControlConfig::default(),
            weights_path: PathBuf::from("weights/duckweed-seg.pt"),
            active_low: pins::RELAYS_ACTIVE_LOW,
            valve_pin: pins::INLET_VALVE_GPIO,
            ph_relay_pin: pins::PH_RELAY_GPIO,
        }
    }
}

impl SystemConfig {
    pub fn wiring(&self) -> RelayWiring {
        RelayWiring {
            polarity: Polarity::from_active_low(self.active_low),
            valve_pin: self.valve_pin,
            ph_relay_pin: self.ph_relay_pin,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        if self.valve_pin == self.ph_relay_pin {
            return Err(ConfigError::ValidationFailed(
                "valve_pin and ph_relay_pin must differ",
            ));
        }
        Ok(())
    }
}
