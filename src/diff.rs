//! Delta computation between consecutive snapshots.

use serde::Serialize;

use crate::storage::model::{Field, Snapshot};

/// Latest value and change for one field, in kilobytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: Field,
    pub latest: u64,
    /// Signed change since the previous snapshot; negative when memory was released.
    pub increase: i64,
}

/// Latest values and increases for all tracked fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    pub from_seq: usize,
    pub to_seq: usize,
    /// One entry per field, in [`Field::ALL`] order.
    pub fields: [FieldDiff; 4],
}

impl DiffRecord {
    pub fn get(&self, field: Field) -> &FieldDiff {
        // `fields` is built from `Field::ALL`, so the discriminant is the index.
        &self.fields[field as usize]
    }

    pub fn latest(&self, field: Field) -> u64 {
        self.get(field).latest
    }

    pub fn increase(&self, field: Field) -> i64 {
        self.get(field).increase
    }
}

/// Computes the per-field difference `curr - prev`.
pub fn diff(prev: &Snapshot, curr: &Snapshot) -> DiffRecord {
    DiffRecord {
        from_seq: prev.seq,
        to_seq: curr.seq,
        fields: Field::ALL.map(|field| FieldDiff {
            field,
            latest: curr.get(field),
            increase: delta(curr.get(field), prev.get(field)),
        }),
    }
}

/// Signed `curr - prev` for kB counters, saturating at the `i64` range.
fn delta(curr: u64, prev: u64) -> i64 {
    let delta = i128::from(curr) - i128::from(prev);
    i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::model::MemoryStatus;

    fn snapshot(seq: usize, vm_size: u64, vm_rss: u64, vm_peak: u64, vm_hwm: u64) -> Snapshot {
        Snapshot::new(
            seq,
            MemoryStatus {
                vm_size,
                vm_rss,
                vm_peak,
                vm_hwm,
            },
        )
    }

    #[test]
    fn test_diff_growth() {
        let prev = snapshot(0, 25000, 8000, 30000, 9000);
        let curr = snapshot(1, 27000, 9500, 30000, 9500);
        let record = diff(&prev, &curr);

        assert_eq!((record.from_seq, record.to_seq), (0, 1));
        assert_eq!(record.latest(Field::VmSize), 27000);
        assert_eq!(record.increase(Field::VmSize), 2000);
        assert_eq!(record.increase(Field::VmRss), 1500);
        assert_eq!(record.increase(Field::VmPeak), 0);
        assert_eq!(record.increase(Field::VmHwm), 500);
    }

    #[test]
    fn test_diff_release_is_negative() {
        let prev = snapshot(3, 27000, 9500, 30000, 9500);
        let curr = snapshot(4, 24000, 7000, 30000, 9500);
        let record = diff(&prev, &curr);

        assert_eq!(record.increase(Field::VmSize), -3000);
        assert_eq!(record.increase(Field::VmRss), -2500);
        assert_eq!(record.latest(Field::VmRss), 7000);
    }

    #[test]
    fn test_diff_matches_subtraction_for_all_fields() {
        let pairs = [
            (snapshot(0, 0, 0, 0, 0), snapshot(1, 1, 2, 3, 4)),
            (snapshot(0, 10, 20, 30, 40), snapshot(1, 4, 3, 2, 1)),
            (snapshot(0, u32::MAX as u64, 5, 5, 5), snapshot(1, 0, 5, 6, 4)),
        ];

        for (prev, curr) in &pairs {
            let record = diff(prev, curr);
            for field in Field::ALL {
                assert_eq!(record.get(field).field, field);
                assert_eq!(
                    record.increase(field),
                    curr.get(field) as i64 - prev.get(field) as i64
                );
                assert_eq!(record.latest(field), curr.get(field));
            }
        }
    }

    #[test]
    fn test_diff_saturates_beyond_i64() {
        let max = i64::MAX as u64;
        let record = diff(
            &snapshot(0, 0, 0, u64::MAX, 1),
            &snapshot(1, max, max + 1, 0, 0),
        );

        assert_eq!(record.increase(Field::VmSize), i64::MAX);
        assert_eq!(record.increase(Field::VmRss), i64::MAX);
        assert_eq!(record.increase(Field::VmPeak), i64::MIN);
        assert_eq!(record.increase(Field::VmHwm), -1);

        let record = diff(&snapshot(0, 0, 0, 0, 0), &snapshot(1, u64::MAX, 0, 0, 0));
        assert_eq!(record.increase(Field::VmSize), i64::MAX);
        assert_eq!(record.latest(Field::VmSize), u64::MAX);
    }

    #[test]
    fn test_diff_record_serializes_fields() {
        let record = diff(&snapshot(0, 1, 2, 3, 4), &snapshot(1, 2, 1, 3, 4));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["to_seq"], 1);
        assert_eq!(json["fields"][0]["field"], "VmSize");
        assert_eq!(json["fields"][1]["field"], "VmRSS");
        assert_eq!(json["fields"][1]["increase"], -1);
        assert_eq!(json["fields"][3]["latest"], 4);
    }
}
