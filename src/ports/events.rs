//! Diagnostic event port
//!
//! Stages never print. Anything a collaborator may want to see while the
//! stream keeps flowing is handed to an `EventSink` passed into the call.

use crate::domain::CorrelatorEvent;

/// Receiver for correlator diagnostics
pub trait EventSink {
    fn emit(&mut self, event: CorrelatorEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CorrelatorEvent) {}
}

impl EventSink for Vec<CorrelatorEvent> {
    fn emit(&mut self, event: CorrelatorEvent) {
        self.push(event);
    }
}

impl<F> EventSink for F
where
    F: FnMut(CorrelatorEvent),
{
    fn emit(&mut self, event: CorrelatorEvent) {
        self(event)
    }
}
