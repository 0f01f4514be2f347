//! Event sink that forwards correlator diagnostics over a crossbeam channel,
//! so a collaborator on another thread can subscribe to them.

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::domain::CorrelatorEvent;
use crate::ports::EventSink;

/// Sends every event to a channel receiver
pub struct ChannelSink {
    tx: Sender<CorrelatorEvent>,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(tx: Sender<CorrelatorEvent>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Sink plus receiver over an unbounded channel
    pub fn unbounded() -> (Self, Receiver<CorrelatorEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    /// Sink plus receiver over a bounded channel. Events that find the
    /// channel full are counted and logged instead of blocking the stream.
    pub fn bounded(capacity: usize) -> (Self, Receiver<CorrelatorEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self::new(tx), rx)
    }

    /// Events that could not be delivered
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: CorrelatorEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.dropped += 1;
                log::warn!("event channel full, dropped {event:?}");
            }
            Err(TrySendError::Disconnected(event)) => {
                self.dropped += 1;
                log::warn!("event subscriber gone, dropped {event:?}");
            }
        }
    }
}
