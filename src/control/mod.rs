//! Actuation policies.
//!
//! Both policies are pure functions of their inputs.  The valve uses a
//! single threshold; the pH relay uses a hysteresis band on coverage, or
//! a target band on the measured pH when a reading is available.

pub mod ph;
pub mod valve;

pub use ph::{PhThresholds, decide_ph_active};
pub use valve::decide_valve_closed;
