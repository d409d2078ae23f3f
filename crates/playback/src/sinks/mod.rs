//! Sink implementations
//!
//! Contains LogSink, FileSink, MemorySink and the config-driven SinkSet.

mod file;
mod log;
mod memory;
mod set;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::log::LogSink;
pub use self::memory::{MemoryRecorder, MemorySink};
pub use self::set::{ConfiguredSink, SinkSet};
