//! Two-channel relay board on `embedded-hal` output pins.
//!
//! Channel 1 switches the inlet solenoid valve, channel 2 the pH dosing
//! pump.  Both share one wiring polarity.
//!
//! ## Boot state
//!
//! `new()` drives both pins to the de-energised level so the valve starts
//! open and dosing starts off, regardless of how the pins came up.

use embedded_hal::digital::OutputPin;
use log::{error, info};

use crate::app::ports::ActuatorPort;

use super::{Actuator, Polarity};

pub struct RelayBoard<V, P> {
    valve: V,
    ph: P,
    polarity: Polarity,
}

impl<V: OutputPin, P: OutputPin> RelayBoard<V, P> {
    pub fn new(valve: V, ph: P, polarity: Polarity) -> Self {
        let mut board = Self { valve, ph, polarity };
        let ok_valve = board.drive(Actuator::InletValve, false);
        let ok_ph = board.drive(Actuator::PhRelay, false);
        if ok_valve && ok_ph {
            info!("Relay board initialised ({:?})", polarity);
        }
        board
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Release the pins.
    pub fn into_pins(self) -> (V, P) {
        (self.valve, self.ph)
    }

    fn drive(&mut self, actuator: Actuator, energise: bool) -> bool {
        let high = self.polarity.level_for(energise);
        let result = match actuator {
            Actuator::InletValve => set_level(&mut self.valve, high),
            Actuator::PhRelay => set_level(&mut self.ph, high),
        };
        match result {
            Ok(()) => true,
            Err(kind) => {
                error!("GPIO write for {} failed: {:?}", actuator, kind);
                false
            }
        }
    }
}

fn set_level<O: OutputPin>(pin: &mut O, high: bool) -> Result<(), embedded_hal::digital::ErrorKind> {
    use embedded_hal::digital::Error as _;

    let r = if high { pin.set_high() } else { pin.set_low() };
    r.map_err(|e| e.kind())
}

impl<V, P> ActuatorPort for RelayBoard<V, P>
where
    V: OutputPin + Send,
    P: OutputPin + Send,
{
    fn apply_state(&mut self, actuator: Actuator, desired: bool) -> bool {
        self.drive(actuator, desired)
    }

    fn is_available(&self) -> bool {
        true
    }
}
