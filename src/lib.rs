//! bitlock: symbol timing recovery and access-code correlation
//!
//! Two independent stream stages for a digital receiver: a Mueller & Muller
//! clock recovery loop that turns oversampled baseband into one sample per
//! symbol, and a 64-bit sliding correlator that finds a sync word in the
//! sliced bitstream, tolerating bit errors and polarity inversion.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, errors and configuration profiles
//! - `ports/` - Trait definitions for the host scheduler and diagnostics
//! - `dsp/` - Sample-domain processing (interpolator, clock recovery)
//! - `modem/` - Bit-domain processing (slicer, access-code correlator)
//! - `adapters/` - Event sinks (log, channel) and profile persistence
//!
//! A host wires the stages together:
//!
//! ```rust
//! use bitlock_lib::dsp::{ClockRecovery, ClockRecoveryInput, ClockRecoveryOutput};
//! use bitlock_lib::modem::{AccessCodeCorrelator, BinarySlicer};
//! use bitlock_lib::ports::{Forecast, NullSink};
//!
//! let mut clock = ClockRecovery::new(4.0, 0.0077, 0.5, 0.175, 0.005).unwrap();
//! let mut correlator = AccessCodeCorrelator::new("1010", 0, true).unwrap();
//!
//! let samples = vec![1.0f32; clock.forecast(16)];
//! let mut symbols = vec![0.0f32; 16];
//! let report = clock.process(
//!     ClockRecoveryInput::new(&samples),
//!     ClockRecoveryOutput::new(&mut symbols),
//! );
//!
//! let mut bits = vec![0u8; report.symbols];
//! BinarySlicer::new().slice(&symbols[..report.symbols], &mut bits);
//!
//! let mut tagged = vec![0u8; bits.len()];
//! correlator.process(&bits, &mut tagged, &mut NullSink);
//! ```

// Core domain (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod modem;
pub mod ports;

// Adapters (logging, channels, files)
pub mod adapters;
