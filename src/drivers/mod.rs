//! Actuator drivers.
//!
//! Every driver implements [`ActuatorPort`](crate::app::ports::ActuatorPort)
//! and deals only in logical states: "closed" for the valve, "active" for
//! the pH relay.  Pin polarity is resolved here, never in the policies.

pub mod null;
pub mod relay;

use core::fmt;

use serde::Serialize;

use crate::pins;

pub use null::NullDriver;
pub use relay::RelayBoard;

/// The two controlled outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    InletValve,
    PhRelay,
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InletValve => write!(f, "inlet valve"),
            Self::PhRelay => write!(f, "pH relay"),
        }
    }
}

/// Relay input wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// HIGH energises the relay.
    ActiveHigh,
    /// LOW energises the relay.
    ActiveLow,
}

impl Polarity {
    pub fn from_active_low(active_low: bool) -> Self {
        if active_low { Self::ActiveLow } else { Self::ActiveHigh }
    }

    /// Pin level (`true` = HIGH) that puts the relay in the requested state.
    pub fn level_for(self, energise: bool) -> bool {
        match self {
            Self::ActiveHigh => energise,
            Self::ActiveLow => !energise,
        }
    }
}

/// Configured relay pins and polarity, reported whether or not a board
/// is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelayWiring {
    pub polarity: Polarity,
    pub valve_pin: u8,
    pub ph_relay_pin: u8,
}

impl Default for RelayWiring {
    fn default() -> Self {
        Self {
            polarity: Polarity::from_active_low(pins::RELAYS_ACTIVE_LOW),
            valve_pin: pins::INLET_VALVE_GPIO,
            ph_relay_pin: pins::PH_RELAY_GPIO,
        }
    }
}

impl fmt::Display for RelayWiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.polarity {
            Polarity::ActiveHigh => "active-high",
            Polarity::ActiveLow => "active-low",
        };
        write!(
            f,
            "valve=BCM{} pH=BCM{} {}",
            self.valve_pin, self.ph_relay_pin, level
        )
    }
}
