//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (relays, pH probe, segmentation backend, event sinks,
//! config sources) implement these traits.  The
//! [`ControlService`](super::service::ControlService) consumes them via
//! generics or trait objects, so the domain core never touches hardware
//! or an ML runtime directly.

use std::path::Path;

use image::RgbImage;

use crate::config::SystemConfig;
use crate::drivers::Actuator;
use crate::error::{ConfigError, ModelError};
use crate::vision::segmentation::{InferenceParams, InstanceMask};

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this after every decision.
pub trait ActuatorPort: Send {
    /// Drive `actuator` to the logical state `desired` (`true` = valve
    /// closed / pH relay active).  Returns whether the command reached
    /// the hardware.
    fn apply_state(&mut self, actuator: Actuator, desired: bool) -> bool;

    /// Whether a physical driver is wired up at all.
    fn is_available(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// pH sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for a pH probe.
pub trait PhSensorPort {
    /// `None` when no probe is connected or the read failed.
    fn read_ph(&mut self) -> Option<f32>;
}

// ───────────────────────────────────────────────────────────────
// Segmentation backend
// ───────────────────────────────────────────────────────────────

/// A loaded instance-segmentation model.
///
/// Inference may be slow and may use its own threads; the service calls
/// it synchronously with no timeout.
pub trait SegmentationModel: Send + Sync {
    fn predict(
        &self,
        frame: &RgbImage,
        params: &InferenceParams,
    ) -> Result<Vec<InstanceMask>, ModelError>;
}

/// Presence of a backend at build/start time is modelled as having a loader.
pub trait ModelLoader {
    fn load(&self, weights: &Path) -> Result<Box<dyn SegmentationModel>, ModelError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads startup configuration.
///
/// Implementations MUST validate before returning; an invalid source is
/// an error, not silently clamped.
pub trait ConfigPort {
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}
