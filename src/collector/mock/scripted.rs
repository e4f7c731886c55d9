//! Engine that replays a fixed sequence of readings.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use crate::collector::traits::StatusEngine;
use crate::error::UsageError;
use crate::storage::model::MemoryStatus;

/// Returns queued readings in order, then fails with an I/O error.
///
/// Clones share the queue and the read counter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    readings: Rc<RefCell<VecDeque<MemoryStatus>>>,
    reads: Rc<Cell<usize>>,
}

impl ScriptedEngine {
    pub fn new(readings: impl IntoIterator<Item = MemoryStatus>) -> Self {
        Self {
            readings: Rc::new(RefCell::new(readings.into_iter().collect())),
            reads: Rc::new(Cell::new(0)),
        }
    }

    /// Script where each reading has the given RSS and a virtual size of
    /// `rss + 100_000`. Peaks follow the running maximum.
    pub fn from_rss(rss_values: &[u64]) -> Self {
        let mut peak_rss = 0;
        let readings = rss_values.iter().map(|&rss| {
            peak_rss = peak_rss.max(rss);
            MemoryStatus {
                vm_size: rss + 100_000,
                vm_rss: rss,
                vm_peak: peak_rss + 100_000,
                vm_hwm: peak_rss,
            }
        });
        Self::new(readings.collect::<Vec<_>>())
    }

    /// Appends a reading to the end of the script.
    pub fn push(&self, status: MemoryStatus) {
        self.readings.borrow_mut().push_back(status);
    }

    /// Number of `read_status` calls so far, including failed ones.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn remaining(&self) -> usize {
        self.readings.borrow().len()
    }
}

impl StatusEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn read_status(&self) -> Result<MemoryStatus, UsageError> {
        self.reads.set(self.reads.get() + 1);
        self.readings
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| UsageError::Io {
                path: PathBuf::from("scripted"),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"),
            })
    }
}
