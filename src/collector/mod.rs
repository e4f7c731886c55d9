//! Status engines for reading the process's own memory fields.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 MemoryUsage                  │
//! └──────────────────────┬───────────────────────┘
//!                        │
//!                 ┌──────▼───────┐
//!                 │ StatusEngine │ (trait)
//!                 └──────┬───────┘
//!            ┌───────────┴─────────────┐
//!     ┌──────▼─────────────┐   ┌───────▼────────┐
//!     │ ProcStatusEngine   │   │ ScriptedEngine │
//!     │ /proc/[pid]/status │   │ (Testing)      │
//!     └──────┬─────────────┘   └────────────────┘
//!            │
//!     ┌──────▼──────┐
//!     │ FileSystem  │ (trait)
//!     └──────┬──────┘
//!      ┌─────┴──────┐
//!   RealFs        MockFs
//! ```
//!
//! # Usage
//!
//! ```
//! use memusage::collector::{MockFs, ProcStatusEngine, StatusEngine};
//!
//! let mut fs = MockFs::new();
//! fs.set_memory(42, 25000, 8000, 30000, 9000);
//! let engine = ProcStatusEngine::new(fs, "/proc", 42);
//! assert_eq!(engine.read_status().unwrap().vm_rss, 8000);
//! ```

pub mod mock;
pub mod procfs;
pub mod traits;

use std::sync::OnceLock;

use tracing::debug;

use crate::error::UsageError;

pub use mock::{MockFs, ScriptedEngine};
pub use procfs::{ParseError, ProcStatusEngine};
pub use traits::{FileSystem, RealFs, StatusEngine};

/// Engine used for the current process on a supported host.
pub type HostEngine = ProcStatusEngine<RealFs>;

/// Host operating systems with a status engine.
pub const SUPPORTED_HOSTS: &[&str] = &["linux"];

/// Selects the engine for a host OS identifier (as in `std::env::consts::OS`).
///
/// The engine reads `/proc/<pid>/status` of the calling process.
pub fn select(os: &str) -> Result<HostEngine, UsageError> {
    match os {
        "linux" => Ok(ProcStatusEngine::new(RealFs, "/proc", std::process::id())),
        other => Err(UsageError::UnsupportedHost(other.to_string())),
    }
}

/// Returns the engine for the running host.
///
/// Selection happens once per process; later calls reuse the first outcome.
pub fn host() -> Result<HostEngine, UsageError> {
    static HOST: OnceLock<Result<HostEngine, String>> = OnceLock::new();

    HOST.get_or_init(|| {
        let os = std::env::consts::OS;
        let selected = select(os).map_err(|_| os.to_string());
        debug!(os, supported = selected.is_ok(), "selected host status engine");
        selected
    })
    .clone()
    .map_err(UsageError::UnsupportedHost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_linux() {
        let engine = select("linux").unwrap();
        assert_eq!(engine.pid(), std::process::id());
        assert_eq!(
            engine.status_path(),
            std::path::PathBuf::from(format!("/proc/{}/status", std::process::id()))
        );
    }

    #[test]
    fn test_select_unsupported() {
        for os in ["windows", "macos", "freebsd", ""] {
            match select(os) {
                Err(UsageError::UnsupportedHost(name)) => assert_eq!(name, os),
                other => panic!("expected UnsupportedHost for {:?}, got {:?}", os, other),
            }
        }
    }

    #[test]
    fn test_host_matches_supported_list() {
        let supported = SUPPORTED_HOSTS.contains(&std::env::consts::OS);
        assert_eq!(host().is_ok(), supported);
        // Cached outcome is stable.
        assert_eq!(host().is_ok(), supported);
    }
}
