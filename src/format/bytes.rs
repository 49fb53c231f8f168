//! Signed byte counts as short human strings.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const STEP: f64 = 1024.0;

/// Render a signed byte count, e.g. `-100 B` or `1.50 MB`.
///
/// Counts below one kilobyte are printed as whole bytes; larger values use
/// 1024-based units with two decimals.
pub fn format_bytes(bytes: i64) -> String {
    if bytes.unsigned_abs() < STEP as u64 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value.abs() >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}
