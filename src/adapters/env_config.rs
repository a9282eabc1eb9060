//! Environment-variable config adapter.
//!
//! | Variable                   | Field                      |
//! |----------------------------|----------------------------|
//! | `INLET_VALVE_PIN`          | `valve_pin`                |
//! | `INLET_ACTIVE_LOW`         | `active_low` (0 / 1)       |
//! | `DUCKWEED_CLOSE_THRESHOLD` | `control.close_threshold`  |
//! | `PH_RELAY_PIN`             | `ph_relay_pin`             |
//! | `PH_THRESHOLD_LOW`         | `control.ph_low`           |
//! | `PH_THRESHOLD_HIGH`        | `control.ph_high`          |
//! | `TARGET_PH_MIN`            | `control.target_ph_min`    |
//! | `TARGET_PH_MAX`            | `control.target_ph_max`    |
//! | `DUCKWEED_WEIGHTS`         | `weights_path`             |
//!
//! Unset variables keep their defaults.  The variables are snapshotted at
//! construction so tests can supply their own set.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.trim())
    }

    fn parse<T: FromStr>(&self, key: &'static str, into: &mut T) -> Result<(), ConfigError> {
        if let Some(raw) = self.raw(key) {
            *into = raw.parse().map_err(|_| ConfigError::Unparsable {
                key,
                value: raw.to_string(),
            })?;
        }
        Ok(())
    }

    fn parse_flag(&self, key: &'static str, into: &mut bool) -> Result<(), ConfigError> {
        let Some(raw) = self.raw(key) else {
            return Ok(());
        };
        *into = match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => true,
            "false" | "no" | "off" => false,
            other => other.parse::<i64>().map(|n| n != 0).map_err(|_| {
                ConfigError::Unparsable {
                    key,
                    value: raw.to_string(),
                }
            })?,
        };
        Ok(())
    }
}

impl ConfigPort for EnvConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut c = SystemConfig::default();
        self.parse("INLET_VALVE_PIN", &mut c.valve_pin)?;
        self.parse_flag("INLET_ACTIVE_LOW", &mut c.active_low)?;
        self.parse("DUCKWEED_CLOSE_THRESHOLD", &mut c.control.close_threshold)?;
        self.parse("PH_RELAY_PIN", &mut c.ph_relay_pin)?;
        self.parse("PH_THRESHOLD_LOW", &mut c.control.ph_low)?;
        self.parse("PH_THRESHOLD_HIGH", &mut c.control.ph_high)?;
        self.parse("TARGET_PH_MIN", &mut c.control.target_ph_min)?;
        self.parse("TARGET_PH_MAX", &mut c.control.target_ph_max)?;
        if let Some(raw) = self.raw("DUCKWEED_WEIGHTS") {
            c.weights_path = PathBuf::from(raw);
        }
        c.validate()?;
        Ok(c)
    }
}
