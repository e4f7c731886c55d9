//! Parser for `/proc/[pid]/status`.
//!
//! Pure functions over the file content, testable with string inputs.

use std::collections::BTreeMap;

use crate::storage::model::Field;

/// Unit suffix the kernel uses for memory fields.
const KB_UNIT: &str = "kB";

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses the tracked memory fields out of `/proc/[pid]/status` content.
///
/// Format is `key:\tvalue` pairs, one per line. Memory values look like
/// `"12345 kB"`. Keys other than the tracked [`Field`]s are ignored, so the
/// result may hold fewer than four entries.
pub fn parse_status_fields(content: &str) -> Result<BTreeMap<Field, u64>, ParseError> {
    let mut fields = BTreeMap::new();

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Some(field) = Field::from_key(key.trim()) else {
            continue;
        };
        fields.insert(field, parse_kb(field, value.trim())?);
    }

    Ok(fields)
}

/// Parses `"<n> kB"` into `n`, rejecting any other unit.
fn parse_kb(field: Field, value: &str) -> Result<u64, ParseError> {
    let mut parts = value.split_whitespace();
    let number = parts
        .next()
        .ok_or_else(|| ParseError::new(format!("empty value for {}", field.key())))?;
    let unit = parts
        .next()
        .ok_or_else(|| ParseError::new(format!("missing unit for {}", field.key())))?;

    if unit != KB_UNIT || parts.next().is_some() {
        return Err(ParseError::new(format!(
            "unexpected unit for {}: expected '{}', got '{}'",
            field.key(),
            KB_UNIT,
            value
        )));
    }

    number
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {}: '{}'", field.key(), number)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_field() {
        let fields = parse_status_fields("VmSize:    1234 kB\n").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(&Field::VmSize), Some(&1234));
    }

    #[test]
    fn test_parse_full_status() {
        let content = "\
Name:\tbash
Umask:\t0022
State:\tS (sleeping)
Pid:\t1234
PPid:\t1233
Uid:\t1000\t1000\t1000\t1000
VmPeak:\t   30000 kB
VmSize:\t   25000 kB
VmLck:\t        0 kB
VmHWM:\t    9000 kB
VmRSS:\t    8000 kB
VmData:\t    2000 kB
VmSwap:\t        0 kB
voluntary_ctxt_switches:\t500
";
        let fields = parse_status_fields(content).unwrap();

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[&Field::VmPeak], 30000);
        assert_eq!(fields[&Field::VmSize], 25000);
        assert_eq!(fields[&Field::VmHwm], 9000);
        assert_eq!(fields[&Field::VmRss], 8000);
    }

    #[test]
    fn test_parse_ignores_untracked_and_malformed_lines() {
        let content = "garbage without colon\nVmData:\tnot a number\nVmRSS:\t42 kB\n";
        let fields = parse_status_fields(content).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[&Field::VmRss], 42);
    }

    #[test]
    fn test_parse_missing_unit() {
        let err = parse_status_fields("VmSize:\t1234\n").unwrap_err();
        assert!(err.message.contains("missing unit"));
    }

    #[test]
    fn test_parse_wrong_unit() {
        let err = parse_status_fields("VmRSS:\t1234 mB\n").unwrap_err();
        assert!(err.message.contains("unexpected unit for VmRSS"));
    }

    #[test]
    fn test_parse_trailing_token() {
        assert!(parse_status_fields("VmHWM:\t12 kB extra\n").is_err());
    }

    #[test]
    fn test_parse_invalid_number() {
        let err = parse_status_fields("VmPeak:\t12x kB\n").unwrap_err();
        assert!(err.message.contains("invalid VmPeak"));
    }

    #[test]
    fn test_parse_empty_value() {
        let err = parse_status_fields("VmSize:\n").unwrap_err();
        assert!(err.message.contains("empty value"));
    }
}
