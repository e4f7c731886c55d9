//! Append-only snapshot history of one measurement session.

use crate::error::UsageError;
use crate::storage::model::{MemoryStatus, Snapshot};

/// Ordered snapshots, oldest first. Entries are never removed or modified.
#[derive(Debug, Default, Clone)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reading and returns the stored snapshot.
    pub fn push(&mut self, status: MemoryStatus) -> &Snapshot {
        let seq = self.snapshots.len();
        self.snapshots.push(Snapshot::new(seq, status));
        &self.snapshots[seq]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Returns `(previous, latest)`.
    pub fn last_two(&self) -> Result<(&Snapshot, &Snapshot), UsageError> {
        match self.snapshots.as_slice() {
            [.., prev, curr] => Ok((prev, curr)),
            _ => Err(UsageError::InsufficientHistory {
                snapshots: self.snapshots.len(),
            }),
        }
    }
}
