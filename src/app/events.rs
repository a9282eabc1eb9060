//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use crate::drivers::Actuator;
use crate::vision::EstimatorMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A frame was analysed (coverage already rounded).
    Analyzed {
        mode: EstimatorMode,
        coverage_pct: f64,
        ph_reading: Option<f32>,
    },

    /// An actuator was commanded, by policy or manually.
    Commanded {
        actuator: Actuator,
        engaged: bool,
        applied: bool,
        manual: bool,
    },

    /// The valve close threshold changed.
    ThresholdUpdated { from: f64, to: f64 },

    /// A threshold update was refused; the old value stays.
    ThresholdRejected { requested: f64, kept: f64 },
}
