//! # In-process timers with checkpoints
//!
//! Mark named spans of a running program, subdivide them into checkpoints,
//! and read back elapsed wall-clock time and memory deltas, either as
//! structured values or as text appended to a daily log file.
//!
//! ## Components
//!
//! 1. **Timer store**: named timers, their checkpoints and the
//!    start → checkpoint → stop lifecycle ([`TimerStore`])
//! 2. **Duration text**: seconds decomposed into localized units,
//!    `"2 days, 3 hours"` ([`DurationFormatter`])
//! 3. **Dump indenting**: schema-unaware re-indenting of compact object
//!    text ([`pretty_print`])
//!
//! Clock, memory, enablement switch and log destination are injected, so
//! independent stores can coexist and tests can script every sample.
//!
//! ## Usage Example
//!
//! ```no_run
//! use timekeep::{TimerConfig, TimerStore};
//!
//! let mut timers = TimerStore::new(TimerConfig::from_env());
//! timers.start("build", Some("compile step"));
//! timers.checkpoint("build", Some("parsed"));
//! let _entry = timers.stop("build");
//! timers.log()?;
//! # Ok::<(), timekeep::TimerError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;  // Store configuration
pub mod format;  // Duration, byte and dump rendering
pub mod sampler; // Clock, memory and enablement seams
pub mod sink;    // Daily log destinations
pub mod store;   // Timer state machine

// Re-exports for convenience
pub use config::TimerConfig;
pub use format::{format_bytes, pretty_print, DurationFormatter, UnitNames};
pub use sampler::{Clock, EnvSwitch, MemorySampler, ProcessMemory, Switch, SystemClock};
pub use sink::{DailyFileSink, LogSink, MemorySink};
pub use store::{Checkpoint, Snapshot, TimerEntry, TimerStore, TimerStoreBuilder};

use thiserror::Error;

/// Errors raised while persisting timers
#[derive(Error, Debug)]
pub enum TimerError {
    /// The dump could not be serialized
    #[error("failed to serialize timer dump: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The log sink rejected the write
    #[error("failed to write timer log: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for timer persistence
pub type Result<T> = std::result::Result<T, TimerError>;
