//! Plain-text timer report
//!
//! One start line and one end line per timer, one line per checkpoint, and a
//! blank line after each timer. Lines end with CRLF.

use std::fmt::Write;

use chrono::{DateTime, Local};

use super::{Snapshot, TimerEntry};

const LINE_END: &str = "\r\n";

/// Significant digits kept for numeric diffs in the report.
const DIFF_PRECISION: usize = 14;

/// Render `ts` (seconds since the epoch) as local `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: f64) -> String {
    if !ts.is_finite() {
        return String::new();
    }
    DateTime::from_timestamp(ts.floor() as i64, 0)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}

/// Render a diff with [`DIFF_PRECISION`] significant digits, trailing zeros
/// trimmed, so `0.7000000000000028` reads `0.7` and `2.0` reads `2`.
///
/// Magnitudes below `1e-4` or from `1e14` up switch to exponent form
/// (`1.5E-5`, `1.0E+20`).
pub fn format_diff(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // rounding can carry into the next power of ten, so take the exponent
    // from the rounded scientific form
    let scientific = format!("{:.*e}", DIFF_PRECISION - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= DIFF_PRECISION as i32 {
        let mut mantissa = trim_fraction(mantissa).to_string();
        if !mantissa.contains('.') {
            mantissa.push_str(".0");
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}E{}{}", mantissa, sign, exponent.abs());
    }

    let decimals = (DIFF_PRECISION as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn render_entry(out: &mut String, name: &str, entry: &TimerEntry) {
    // writing into a String cannot fail
    let _ = write!(
        out,
        "[{}] {}: {}{}",
        format_timestamp(entry.time.start),
        name,
        entry.description.as_deref().unwrap_or_default(),
        LINE_END
    );
    let _ = write!(
        out,
        "[{}] {}: took {} ({}), memory usage: {}  {}",
        entry.time.end.map(format_timestamp).unwrap_or_default(),
        name,
        entry.time.human.as_deref().unwrap_or_default(),
        entry.time.diff.map(format_diff).unwrap_or_default(),
        entry.memory.human.as_deref().unwrap_or_default(),
        LINE_END
    );

    for checkpoint in &entry.checkpoints {
        let _ = write!(
            out,
            "[{}] {} : took {} ({}), memory usage: {} {}",
            format_timestamp(checkpoint.time.end),
            checkpoint.description.as_deref().unwrap_or_default(),
            checkpoint.time.human,
            format_diff(checkpoint.reported_time_diff()),
            checkpoint.memory.human,
            LINE_END
        );
    }

    out.push_str(LINE_END);
}

pub(super) fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for (name, entry) in snapshot.iter() {
        render_entry(&mut out, name, entry);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{format_bytes, DurationFormatter, UnitNames};
    use test_case::test_case;

    #[test]
    fn timestamp_has_fixed_width() {
        let text = format_timestamp(1_700_000_000.75);
        assert_eq!(text.len(), 19);
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[13..14], ":");
    }

    #[test]
    fn non_finite_timestamp_is_empty() {
        assert_eq!(format_timestamp(f64::NAN), "");
    }

    #[test]
    fn renders_entry_and_checkpoints() {
        let durations = DurationFormatter::new(UnitNames::english());
        let mut entry = TimerEntry::started(Some("compile step".into()), 100.0, 1000);
        entry.push_checkpoint(Some("parsed".into()), 100.5, 1200, &durations, &format_bytes);
        entry.push_checkpoint(Some("linked".into()), 101.2, 1100, &durations, &format_bytes);
        entry.finish_time(102.0, &durations);
        entry.finish_memory(1050, &format_bytes);

        let snapshot = Snapshot::from(vec![("build".to_string(), entry)]);
        let report = render(&snapshot);
        let lines: Vec<&str> = report.split("\r\n").collect();

        let start = format_timestamp(100.0);
        let end = format_timestamp(102.0);
        assert_eq!(lines[0], format!("[{start}] build: compile step"));
        assert_eq!(
            lines[1],
            format!("[{end}] build: took 2 seconds (2), memory usage: 50 B  ")
        );
        assert_eq!(
            lines[2],
            format!(
                "[{}] parsed : took a second (0.5), memory usage: 200 B ",
                format_timestamp(100.5)
            )
        );
        assert_eq!(
            lines[3],
            format!(
                "[{}] linked : took a second (0.7), memory usage: -100 B ",
                format_timestamp(101.2)
            )
        );
        assert_eq!(lines[4], "");
        assert!(report.ends_with("\r\n\r\n"));
    }

    #[test_case(2.0, "2" ; "whole number drops the fraction")]
    #[test_case(101.2 - 100.5, "0.7" ; "float noise is rounded away")]
    #[test_case(0.75, "0.75" ; "short fraction kept")]
    #[test_case(-0.25, "-0.25" ; "negative")]
    #[test_case(0.0, "0" ; "zero")]
    #[test_case(1.0 / 3.0, "0.33333333333333" ; "fourteen significant digits")]
    #[test_case(9.999_999_999_999_999, "10" ; "rounding carries")]
    #[test_case(0.0001, "0.0001" ; "small stays fixed")]
    #[test_case(0.000_015, "1.5E-5" ; "tiny uses exponent")]
    #[test_case(1e20, "1.0E+20" ; "huge uses exponent")]
    fn diff_rendering(value: f64, expected: &str) {
        assert_eq!(format_diff(value), expected);
    }

    #[test]
    fn empty_snapshot_renders_nothing() {
        assert_eq!(render(&Snapshot::default()), "");
    }
}
