//! Process memory sampling.

use std::fs;

/// Source of the current memory usage of the process, in bytes.
pub trait MemorySampler {
    /// Bytes in use right now.
    fn current_usage(&self) -> i64;
}

/// Resident set size read from `/proc/self/status`.
///
/// Reads as 0 where procfs is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemorySampler for ProcessMemory {
    fn current_usage(&self) -> i64 {
        fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|status| parse_vm_rss(&status))
            .unwrap_or(0)
    }
}

impl<F> MemorySampler for F
where
    F: Fn() -> i64,
{
    fn current_usage(&self) -> i64 {
        self()
    }
}

/// Extract `VmRSS` (reported in kB) as bytes.
fn parse_vm_rss(status: &str) -> Option<i64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    // Format: "VmRSS:    123456 kB"
    let kb: i64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}
