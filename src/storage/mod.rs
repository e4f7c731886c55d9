//! Snapshot data model and per-session history.

mod history;
pub mod model;

pub use history::SnapshotStore;
pub use model::{Field, MemoryStatus, Snapshot};
