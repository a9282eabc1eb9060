//! Inbound commands to the control service.
//!
//! Manual overrides from an operator or a request handler.  They bypass
//! the coverage pipeline but go through the same driver and state store.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Force the inlet valve closed (`true`) or open (`false`).
    SetValve(bool),

    /// Force pH adjustment on or off.
    SetPhAdjustment(bool),

    /// Replace the valve close threshold.  Rejected outside `0..=100`.
    SetCloseThreshold(f64),
}
