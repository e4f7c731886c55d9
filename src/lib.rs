//! memusage - measure the memory used by a block of code in the current process.
//!
//! Reads `VmSize`, `VmRSS`, `VmPeak` and `VmHWM` from `/proc/<pid>/status`
//! and reports how they changed between two measurement points.
//!
//! Provides:
//! - `collector` - status engines (`/proc` reader, selection by host OS, test doubles)
//! - `storage` - snapshot model and per-session history
//! - `diff` - latest values and increases between consecutive snapshots
//! - `fmt` - unit scaling and the fixed-width report table
//! - `session` - `MemoryUsage`, the `Scope` guard and `Measured` callables

pub mod collector;
pub mod diff;
mod error;
pub mod fmt;
pub mod session;
pub mod storage;

pub use diff::{DiffRecord, FieldDiff};
pub use error::UsageError;
pub use session::{Measured, MemoryUsage, Scope, measured};
pub use storage::{Field, MemoryStatus, Snapshot};
