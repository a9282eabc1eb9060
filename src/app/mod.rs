//! Application core: domain logic behind port traits.
//!
//! Coverage estimation, the valve and pH policies, and the actuator state
//! they share.  All interaction with hardware, sensors and ML backends
//! happens through **port traits** defined in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
