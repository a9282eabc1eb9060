//! Headless driver for machines with no relay board attached.
//!
//! Commands are logged and reported as not applied; the service still
//! records the desired state so status output stays meaningful offline.

use log::info;

use crate::app::ports::ActuatorPort;

use super::Actuator;

#[derive(Debug, Default, Clone, Copy)]
pub struct NullDriver;

impl NullDriver {
    pub fn new() -> Self {
        Self
    }
}

impl ActuatorPort for NullDriver {
    fn apply_state(&mut self, actuator: Actuator, desired: bool) -> bool {
        info!("[headless] {} -> {} (not applied)", actuator, desired);
        false
    }

    fn is_available(&self) -> bool {
        false
    }
}
