//! pH adjustment policy.
//!
//! ## Priority
//!
//! 1. A sensor reading, when present, decides alone: activate outside
//!    `[target_min, target_max]`, deactivate inside.
//! 2. Otherwise coverage drives a three-way band:
//!
//! ```text
//!   0 ──── low ════ hold ════ high ──── 100
//!   activate     previous state     deactivate
//! ```
//!
//! Inside the open band the previously commanded state is kept; a relay
//! that has never been commanded stays inactive.

use crate::config::ControlConfig;
use crate::state::ActuatorState;

/// The four thresholds the pH policy reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhThresholds {
    pub low: f64,
    pub high: f64,
    pub target_min: f32,
    pub target_max: f32,
}

impl From<&ControlConfig> for PhThresholds {
    fn from(c: &ControlConfig) -> Self {
        Self {
            low: c.ph_low,
            high: c.ph_high,
            target_min: c.target_ph_min,
            target_max: c.target_ph_max,
        }
    }
}

/// `true` energises the pH adjustment relay.
pub fn decide_ph_active(
    coverage_pct: f64,
    ph_reading: Option<f32>,
    thresholds: &PhThresholds,
    current: ActuatorState,
) -> bool {
    if let Some(ph) = ph_reading {
        return ph < thresholds.target_min || ph > thresholds.target_max;
    }

    if coverage_pct <= thresholds.low {
        true
    } else if coverage_pct >= thresholds.high {
        false
    } else {
        current.as_bool().unwrap_or(false)
    }
}
