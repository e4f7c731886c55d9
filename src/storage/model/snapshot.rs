//! Snapshot structures.
//!
//! A [`Snapshot`] is one parsed reading of the tracked `/proc/[pid]/status`
//! fields, tagged with its position in the session history.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collector::procfs::parser::ParseError;

/// A memory field tracked from `/proc/[pid]/status`.
///
/// Variants are declared in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Field {
    /// Current virtual memory size.
    VmSize,
    /// Current resident set size.
    #[serde(rename = "VmRSS")]
    VmRss,
    /// Peak virtual memory size.
    VmPeak,
    /// Peak resident set size ("high water mark").
    #[serde(rename = "VmHWM")]
    VmHwm,
}

impl Field {
    /// All tracked fields in report order.
    pub const ALL: [Field; 4] = [Field::VmSize, Field::VmRss, Field::VmPeak, Field::VmHwm];

    /// Key as it appears in the status file.
    pub fn key(self) -> &'static str {
        match self {
            Field::VmSize => "VmSize",
            Field::VmRss => "VmRSS",
            Field::VmPeak => "VmPeak",
            Field::VmHwm => "VmHWM",
        }
    }

    /// Looks up a field by its status-file key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Column group label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Field::VmSize => "Virtual size",
            Field::VmRss => "Resident set",
            Field::VmPeak => "Peak virtual",
            Field::VmHwm => "Peak resident",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values of all tracked fields, in kilobytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStatus {
    pub vm_size: u64,
    pub vm_rss: u64,
    pub vm_peak: u64,
    pub vm_hwm: u64,
}

impl MemoryStatus {
    /// Builds a status from parsed fields. Every tracked field must be present.
    pub fn from_fields(fields: &BTreeMap<Field, u64>) -> Result<Self, ParseError> {
        let get = |field: Field| {
            fields
                .get(&field)
                .copied()
                .ok_or_else(|| ParseError::new(format!("{} not found", field.key())))
        };

        Ok(Self {
            vm_size: get(Field::VmSize)?,
            vm_rss: get(Field::VmRss)?,
            vm_peak: get(Field::VmPeak)?,
            vm_hwm: get(Field::VmHwm)?,
        })
    }

    /// Returns the value of one field in kilobytes.
    pub fn get(&self, field: Field) -> u64 {
        match field {
            Field::VmSize => self.vm_size,
            Field::VmRss => self.vm_rss,
            Field::VmPeak => self.vm_peak,
            Field::VmHwm => self.vm_hwm,
        }
    }
}

/// One reading of the process memory fields.
///
/// Snapshots are created by the session and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Position in the session history; the baseline is 0.
    pub seq: usize,
    /// Wall-clock time of the reading.
    pub taken_at: DateTime<Utc>,
    pub status: MemoryStatus,
}

impl Snapshot {
    pub fn new(seq: usize, status: MemoryStatus) -> Self {
        Self {
            seq,
            taken_at: Utc::now(),
            status,
        }
    }

    pub fn get(&self, field: Field) -> u64 {
        self.status.get(field)
    }
}
