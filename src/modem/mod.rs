//! Bit-level stages
//!
//! Hard decisions from recovered symbols, and access-code correlation over
//! the resulting bitstream.

pub mod access_code;
pub mod slicer;

pub use access_code::AccessCodeCorrelator;
pub use slicer::BinarySlicer;
