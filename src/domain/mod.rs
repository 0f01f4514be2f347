//! Core domain types
//!
//! Pure types with no I/O dependencies. These are shared by the timing
//! loop, the correlator and the adapters that carry their diagnostics.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
