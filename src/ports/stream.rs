//! Stream scheduling port
//!
//! The host scheduler owns the buffers. Before each call it asks a stage how
//! much input it needs; the stage then reports what it actually consumed and
//! produced, which may be less when input runs short.

/// Input sizing query used by the host before each processing call
pub trait Forecast {
    /// Minimum input items needed to produce `noutput_items` outputs
    fn forecast(&self, noutput_items: usize) -> usize;
}
