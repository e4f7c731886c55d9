//! Status engine reading `/proc/[pid]/status`.

use std::path::PathBuf;

use tracing::trace;

use crate::collector::procfs::parser::parse_status_fields;
use crate::collector::traits::{FileSystem, StatusEngine};
use crate::error::UsageError;
use crate::storage::model::MemoryStatus;

/// Reads memory fields of one process from `<proc_path>/<pid>/status`.
#[derive(Debug, Clone)]
pub struct ProcStatusEngine<F: FileSystem> {
    fs: F,
    proc_path: String,
    pid: u32,
}

impl<F: FileSystem> ProcStatusEngine<F> {
    /// Creates a new engine.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    /// * `pid` - Process whose status is read
    pub fn new(fs: F, proc_path: impl Into<String>, pid: u32) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            pid,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path of the status file this engine reads.
    pub fn status_path(&self) -> PathBuf {
        PathBuf::from(format!("{}/{}/status", self.proc_path, self.pid))
    }
}

impl<F: FileSystem> StatusEngine for ProcStatusEngine<F> {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn read_status(&self) -> Result<MemoryStatus, UsageError> {
        let path = self.status_path();
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| UsageError::Io {
                path: path.clone(),
                source,
            })?;
        let fields = parse_status_fields(&content)?;
        let status = MemoryStatus::from_fields(&fields)?;
        trace!(pid = self.pid, rss_kb = status.vm_rss, "read process status");
        Ok(status)
    }
}
