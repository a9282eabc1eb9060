//! Inlet valve policy.

/// `true` closes the inlet valve.
///
/// Single comparison with no dead band: coverage hovering at the threshold
/// will toggle the valve on every frame.
pub fn decide_valve_closed(coverage_pct: f64, close_threshold: f64) -> bool {
    coverage_pct >= close_threshold
}
