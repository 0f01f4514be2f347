//! Digital Signal Processing
//!
//! Pure sample-domain processing. No I/O dependencies.

pub mod clock_recovery;
pub mod interpolator;

// Re-export commonly used items
pub use clock_recovery::{ClockRecovery, ClockRecoveryInput, ClockRecoveryOutput, ClockRecoveryReport};
pub use interpolator::FirInterpolator;
