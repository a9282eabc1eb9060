//! GPIO pin assignments for the relay HAT.
//!
//! BCM numbering.  These are the defaults; the environment and file
//! config loaders may override them.

// ---------------------------------------------------------------------------
// Relay outputs
// ---------------------------------------------------------------------------

/// Inlet solenoid valve relay.
pub const INLET_VALVE_GPIO: u8 = 17;
/// pH dosing pump relay.
pub const PH_RELAY_GPIO: u8 = 18;

/// Relay modules on the reference board energise on a LOW input.
pub const RELAYS_ACTIVE_LOW: bool = true;
