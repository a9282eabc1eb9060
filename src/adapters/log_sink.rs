//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  A request handler that wants to stream events to a
//! dashboard would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] on one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Analyzed {
                mode,
                coverage_pct,
                ph_reading,
            } => {
                let ph = ph_reading.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
                info!(
                    "FRAME | mode={} | coverage={:.2}% | pH={}",
                    mode.name(),
                    coverage_pct,
                    ph
                );
            }
            AppEvent::Commanded {
                actuator,
                engaged,
                applied,
                manual,
            } => {
                info!(
                    "ACT   | {} | engaged={} applied={} | {}",
                    actuator,
                    engaged,
                    applied,
                    if *manual { "manual" } else { "policy" }
                );
            }
            AppEvent::ThresholdUpdated { from, to } => {
                info!("CFG   | close_threshold {} -> {}", from, to);
            }
            AppEvent::ThresholdRejected { requested, kept } => {
                warn!("CFG   | close_threshold {} rejected, kept {}", requested, kept);
            }
        }
    }
}
