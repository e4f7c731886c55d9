//! Abstractions over the status source to enable testing and mocking.
//!
//! The `FileSystem` trait lets the engine read the real `/proc` filesystem
//! on Linux or an in-memory one in tests. `StatusEngine` is the seam the
//! session depends on.

use std::io;
use std::path::Path;

use crate::error::UsageError;
use crate::storage::model::MemoryStatus;

/// Abstraction for filesystem operations.
pub trait FileSystem {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// OS-specific strategy that produces the tracked memory fields of one process.
pub trait StatusEngine {
    /// Short engine name used in log lines.
    fn name(&self) -> &'static str;

    /// Reads the current memory status. The source is read fresh on every call.
    fn read_status(&self) -> Result<MemoryStatus, UsageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_fs_read_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status");
        std::fs::write(&path, "VmRSS:\t8000 kB\n").unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read_to_string(&path).unwrap(), "VmRSS:\t8000 kB\n");
    }

    #[test]
    fn test_real_fs_missing_file() {
        let fs = RealFs::new();
        let err = fs
            .read_to_string(Path::new("/nonexistent/path/12345"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
