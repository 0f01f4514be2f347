//! Event sink that writes correlator diagnostics to the `log` facade.
//!
//! Enable with the usual env filter, for example:
//!
//!   RUST_LOG=bitlock_lib=info
//!
//! Ambiguous matches log at WARN, polarity switches at INFO and plain
//! matches at DEBUG.

use crate::domain::CorrelatorEvent;
use crate::ports::EventSink;

/// Logs every event under a channel label
pub struct LogSink {
    label: String,
}

impl LogSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: CorrelatorEvent) {
        match event {
            CorrelatorEvent::BothPolaritiesMatched { offset } => {
                log::warn!("[{}] Both normal and inverted access code found (bit {offset})", self.label);
            }
            CorrelatorEvent::PolaritySwitched { offset, polarity } => {
                log::info!("[{}] Switching to {polarity:?} polarity (bit {offset})", self.label);
            }
            CorrelatorEvent::CodeMatched {
                offset,
                hamming_distance,
                polarity,
            } => {
                log::debug!(
                    "[{}] Access code found at bit {offset}: {hamming_distance} bit errors, {polarity:?}",
                    self.label
                );
            }
        }
    }
}
