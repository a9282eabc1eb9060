//! Last-commanded actuator state.
//!
//! The store is owned by the service and shared by reference between
//! request threads.  Each actuator has its own mutex so a pH decision can
//! read the held state, drive the relay and record the result without a
//! concurrent request interleaving in between.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::drivers::Actuator;

/// Logical state of one actuator.
///
/// `Engaged` is "closed" for the inlet valve and "active" for the pH relay.
/// `Unknown` means no command has been issued since startup; it is not the
/// same as `Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "Option<bool>")]
pub enum ActuatorState {
    #[default]
    Unknown,
    Engaged,
    Released,
}

impl ActuatorState {
    pub fn from_engaged(engaged: bool) -> Self {
        if engaged { Self::Engaged } else { Self::Released }
    }

    /// `None` while the actuator has never been commanded.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Engaged => Some(true),
            Self::Released => Some(false),
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl From<ActuatorState> for Option<bool> {
    fn from(s: ActuatorState) -> Self {
        s.as_bool()
    }
}

/// What the store remembers about one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorRecord {
    /// Last commanded state, recorded whether or not the driver applied it.
    pub desired: ActuatorState,
    /// Whether the driver reported the last command as applied.
    pub applied: bool,
}

/// Shared store of the last commands sent to the valve and pH relay.
#[derive(Debug, Default)]
pub struct ActuatorStateStore {
    valve: Mutex<ActuatorRecord>,
    ph_relay: Mutex<ActuatorRecord>,
}

impl ActuatorStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock one actuator's slot for a read-decide-apply-commit sequence.
    pub fn lock(&self, actuator: Actuator) -> ActuatorSlot<'_> {
        let cell = match actuator {
            Actuator::InletValve => &self.valve,
            Actuator::PhRelay => &self.ph_relay,
        };
        // A panic mid-update leaves a plain Copy record behind; keep using it.
        ActuatorSlot {
            guard: cell.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    pub fn record(&self, actuator: Actuator) -> ActuatorRecord {
        *self.lock(actuator).guard
    }

    pub fn state(&self, actuator: Actuator) -> ActuatorState {
        self.record(actuator).desired
    }
}

/// Exclusive access to one actuator's record.
pub struct ActuatorSlot<'a> {
    guard: MutexGuard<'a, ActuatorRecord>,
}

impl ActuatorSlot<'_> {
    pub fn state(&self) -> ActuatorState {
        self.guard.desired
    }

    /// Record a command.  The desired state is stored even when `applied`
    /// is false so status output reflects what was asked for.
    pub fn commit(&mut self, desired: bool, applied: bool) {
        self.guard.desired = ActuatorState::from_engaged(desired);
        self.guard.applied = applied;
    }
}
