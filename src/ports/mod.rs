//! Port traits (interfaces)
//!
//! These traits define the boundaries between the processing stages and the
//! host that schedules them and listens to their diagnostics.

pub mod events;
pub mod stream;

pub use events::*;
pub use stream::*;
