//! Error type shared by the engine, the snapshot store and the session.

use std::path::PathBuf;

use crate::collector::procfs::parser::ParseError;

/// Error type for memory measurement failures.
#[derive(Debug)]
pub enum UsageError {
    /// The host operating system has no status engine.
    UnsupportedHost(String),
    /// The status source could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The status source had a missing or malformed field.
    Parse(ParseError),
    /// A diff was requested with fewer than two snapshots recorded.
    InsufficientHistory { snapshots: usize },
    /// Writing the report to the output sink failed.
    Output(std::io::Error),
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageError::UnsupportedHost(os) => {
                write!(f, "unsupported host operating system: {}", os)
            }
            UsageError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            UsageError::Parse(e) => write!(f, "{}", e),
            UsageError::InsufficientHistory { snapshots } => write!(
                f,
                "diff needs at least two snapshots, {} recorded",
                snapshots
            ),
            UsageError::Output(e) => write!(f, "failed to write report: {}", e),
        }
    }
}

impl std::error::Error for UsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UsageError::Io { source, .. } => Some(source),
            UsageError::Parse(e) => Some(e),
            UsageError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for UsageError {
    fn from(e: ParseError) -> Self {
        UsageError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display() {
        let err = UsageError::UnsupportedHost("windows".to_string());
        assert_eq!(err.to_string(), "unsupported host operating system: windows");

        let err = UsageError::InsufficientHistory { snapshots: 1 };
        assert_eq!(
            err.to_string(),
            "diff needs at least two snapshots, 1 recorded"
        );
    }

    #[test]
    fn test_source_chain() {
        let err = UsageError::Io {
            path: PathBuf::from("/proc/1/status"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("failed to read /proc/1/status"));
        assert!(err.source().is_some());

        let err: UsageError = ParseError::new("VmRSS not found").into();
        assert_eq!(err.to_string(), "Parse error: VmRSS not found");
        assert!(err.source().is_some());
    }
}
