//! Report formatting.
//!
//! Pure functions turning kB counts and [`DiffRecord`]s into text. Only
//! [`write_report`] touches I/O.

use std::fmt;
use std::io::Write;

use crate::diff::DiffRecord;
use crate::error::UsageError;
use crate::storage::model::Field;

/// Width of the numeric part of a report cell.
pub const VALUE_WIDTH: usize = 9;

/// Width of a report cell: the number followed by a two-letter unit.
const CELL_WIDTH: usize = VALUE_WIDTH + 2;

/// Width of one field's column group (latest + increase).
const GROUP_WIDTH: usize = CELL_WIDTH * 2 + 1;

const GROUP_SEPARATOR: &str = " | ";

/// Display unit of a scaled kB count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Kb,
    Mb,
    Gb,
    Tb,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::Kb => "KB",
            Unit::Mb => "MB",
            Unit::Gb => "GB",
            Unit::Tb => "TB",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Value scaling
// ---------------------------------------------------------------------------

/// Scales a kB count to the largest unit it strictly exceeds.
///
/// `1000` stays `KB`, `1001` becomes `1.001 MB`. Negative values are scaled
/// by magnitude and keep their sign.
pub fn scale(kb: f64) -> (f64, Unit) {
    let magnitude = kb.abs();
    if magnitude > 1e9 {
        (kb / 1e9, Unit::Tb)
    } else if magnitude > 1e6 {
        (kb / 1e6, Unit::Gb)
    } else if magnitude > 1e3 {
        (kb / 1e3, Unit::Mb)
    } else {
        (kb, Unit::Kb)
    }
}

/// Formats a kB count as a report cell: two decimals, right-aligned to
/// [`VALUE_WIDTH`], then the unit. E.g. `"     1.50MB"`.
pub fn format_value(kb: f64) -> String {
    let (value, unit) = scale(kb);
    format!("{:>width$.2}{}", value, unit, width = VALUE_WIDTH)
}

/// Compact form for log lines, e.g. `"1.50MB"`; `signed` adds a leading `+`.
fn format_compact(kb: f64, signed: bool) -> String {
    let (value, unit) = scale(kb);
    if signed {
        format!("{:+.2}{}", value, unit)
    } else {
        format!("{:.2}{}", value, unit)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Renders the report table: group labels, sub-labels, then one data row.
///
/// ```text
///      Virtual size       |      Resident set       | ...
///      latest    increase |      latest    increase | ...
///     25.00MB      2.00MB |      9.50MB      1.50MB | ...
/// ```
pub fn render_report(record: &DiffRecord) -> String {
    let groups: Vec<String> = Field::ALL
        .iter()
        .map(|field| format!("{:^width$}", field.label(), width = GROUP_WIDTH))
        .collect();

    let sub_labels: Vec<String> = Field::ALL
        .iter()
        .map(|_| format!("{:>w$} {:>w$}", "latest", "increase", w = CELL_WIDTH))
        .collect();

    let values: Vec<String> = record
        .fields
        .iter()
        .map(|d| {
            format!(
                "{} {}",
                format_value(d.latest as f64),
                format_value(d.increase as f64)
            )
        })
        .collect();

    let mut out = String::new();
    for row in [groups, sub_labels, values] {
        out.push_str(row.join(GROUP_SEPARATOR).trim_end());
        out.push('\n');
    }
    out
}

/// Writes the rendered report and flushes the sink.
pub fn write_report<W: Write + ?Sized>(
    sink: &mut W,
    record: &DiffRecord,
) -> Result<(), UsageError> {
    sink.write_all(render_report(record).as_bytes())
        .and_then(|_| sink.flush())
        .map_err(UsageError::Output)
}

/// One-line summary, e.g. `"VmSize 25.00MB (+2.00MB), VmRSS 9.50MB (+1.50MB), ..."`.
pub fn summary(record: &DiffRecord) -> String {
    record
        .fields
        .iter()
        .map(|d| {
            format!(
                "{} {} ({})",
                d.field,
                format_compact(d.latest as f64, false),
                format_compact(d.increase as f64, true)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
