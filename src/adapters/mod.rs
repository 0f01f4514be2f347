//! Adapters
//!
//! Implementations of the event port, plus profile persistence on disk.

pub mod channel_sink;
pub mod log_sink;
pub mod profile_store;

pub use channel_sink::ChannelSink;
pub use log_sink::LogSink;
pub use profile_store::ProfileStore;
