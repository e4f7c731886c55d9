//! In-memory mock filesystem for testing engines without real `/proc`.

use crate::collector::traits::FileSystem;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory filesystem for testing.
///
/// Clones share the same file table, so a test can keep one handle and
/// rewrite `/proc/[pid]/status` while an engine reads through another.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: Rc<RefCell<HashMap<PathBuf, String>>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Adds or replaces `/proc/[pid]/status`.
    pub fn add_status(&mut self, pid: u32, status: &str) {
        self.add_file(format!("/proc/{}/status", pid), status);
    }

    /// Writes a status file holding only the four tracked fields.
    pub fn set_memory(&mut self, pid: u32, vm_size: u64, vm_rss: u64, vm_peak: u64, vm_hwm: u64) {
        let status = format!(
            "Name:\tmock\nPid:\t{pid}\nVmPeak:\t{vm_peak:>8} kB\nVmSize:\t{vm_size:>8} kB\n\
             VmHWM:\t{vm_hwm:>8} kB\nVmRSS:\t{vm_rss:>8} kB\n"
        );
        self.add_status(pid, &status);
    }

    /// Removes a file, simulating a process that went away.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.borrow_mut().remove(path.as_ref());
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::procfs::parse_status_fields;
    use crate::storage::model::Field;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/1/status", "VmRSS:\t1 kB\n");

        let content = fs.read_to_string(Path::new("/proc/1/status")).unwrap();
        assert_eq!(content, "VmRSS:\t1 kB\n");
    }

    #[test]
    fn test_mock_fs_clones_share_files() {
        let mut writer = MockFs::new();
        let reader = writer.clone();
        writer.add_status(7, "VmRSS:\t10 kB\n");
        let path = Path::new("/proc/7/status");
        assert_eq!(reader.read_to_string(path).unwrap(), "VmRSS:\t10 kB\n");

        writer.remove_file(path);
        assert!(reader.read_to_string(path).is_err());
    }

    #[test]
    fn test_mock_fs_set_memory_parses() {
        let mut fs = MockFs::new();
        fs.set_memory(9, 25000, 8000, 30000, 9000);
        let content = fs.read_to_string(Path::new("/proc/9/status")).unwrap();
        let fields = parse_status_fields(&content).unwrap();
        assert_eq!(fields[&Field::VmSize], 25000);
        assert_eq!(fields[&Field::VmRss], 8000);
        assert_eq!(fields[&Field::VmPeak], 30000);
        assert_eq!(fields[&Field::VmHwm], 9000);
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
