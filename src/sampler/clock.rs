//! Timestamp sources.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of timestamps, in seconds with sub-second resolution.
pub trait Clock {
    /// Current timestamp.
    fn now(&self) -> f64;
}

/// Wall clock: seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        // a clock set before 1970 reads as the epoch
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    fn now(&self) -> f64 {
        self()
    }
}
