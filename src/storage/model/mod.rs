//! Data model for memory readings.

mod snapshot;

pub use snapshot::{Field, MemoryStatus, Snapshot};
