//! Timer and checkpoint records
//!
//! Field order matches the serialized dump layout.

use serde::Serialize;

use crate::format::DurationFormatter;

/// Description given to entries synthesized for never-started names.
pub const FALLBACK_DESCRIPTION: &str = "Timer since process start.";

/// Elapsed-time statistics of a timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Timestamp of `start`.
    pub start: f64,
    /// Timestamp of `stop` (or of the dump that closed the timer).
    pub end: Option<f64>,
    /// `end - start`.
    pub diff: Option<f64>,
    /// `diff` as duration text.
    pub human: Option<String>,
}

/// Memory statistics of a timer, in bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStats {
    /// Usage at `start`; absent for fallback entries.
    pub start: Option<i64>,
    /// Usage at `stop`.
    pub end: Option<i64>,
    /// `end - start`, negative when memory was released.
    pub diff: Option<i64>,
    /// `diff` as byte text.
    pub human: Option<String>,
}

/// Time sample of a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointTime {
    /// Timestamp at the checkpoint.
    pub end: f64,
    /// Seconds since the timer started.
    pub diff_from_start: f64,
    /// Since-start text on the first checkpoint, since-last text afterwards.
    pub human: String,
    /// Seconds since the previous checkpoint; absent on the first one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_from_last_checkpoint: Option<f64>,
}

/// Memory sample of a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointMemory {
    /// Usage at the checkpoint.
    pub end: i64,
    /// Bytes gained since the timer started.
    pub diff_from_start: i64,
    /// Since-start text on the first checkpoint, since-last text afterwards.
    pub human: String,
    /// Bytes gained since the previous checkpoint; absent on the first one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_from_last_checkpoint: Option<i64>,
}

/// Intermediate sample inside a timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkpoint {
    /// Optional label.
    pub description: Option<String>,
    /// Time sample.
    pub time: CheckpointTime,
    /// Memory sample.
    pub memory: CheckpointMemory,
}

impl Checkpoint {
    /// The diff shown next to this checkpoint in reports: since-last when
    /// present, since-start otherwise.
    pub fn reported_time_diff(&self) -> f64 {
        self.time
            .diff_from_last_checkpoint
            .unwrap_or(self.time.diff_from_start)
    }
}

/// A named span with its checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerEntry {
    /// Free-text label given at start.
    pub description: Option<String>,
    /// Elapsed time.
    pub time: TimeStats,
    /// Memory delta.
    pub memory: MemoryStats,
    /// Checkpoints in call order.
    pub checkpoints: Vec<Checkpoint>,
}

impl TimerEntry {
    /// Fresh, open entry.
    pub fn started(description: Option<String>, start: f64, memory_start: i64) -> Self {
        Self {
            description,
            time: TimeStats {
                start,
                end: None,
                diff: None,
                human: None,
            },
            memory: MemoryStats {
                start: Some(memory_start),
                end: None,
                diff: None,
                human: None,
            },
            checkpoints: Vec::new(),
        }
    }

    /// Synthetic entry anchored at `start` with no memory baseline.
    pub fn fallback(start: f64) -> Self {
        Self {
            description: Some(FALLBACK_DESCRIPTION.to_string()),
            time: TimeStats {
                start,
                end: None,
                diff: None,
                human: None,
            },
            memory: MemoryStats {
                start: None,
                end: None,
                diff: None,
                human: None,
            },
            checkpoints: Vec::new(),
        }
    }

    /// Whether the elapsed time has been finalized.
    pub fn is_stopped(&self) -> bool {
        self.time.end.is_some()
    }

    // A missing memory baseline counts as zero.
    fn memory_baseline(&self) -> i64 {
        self.memory.start.unwrap_or(0)
    }

    pub(crate) fn finish_time(&mut self, end: f64, durations: &DurationFormatter) {
        let diff = end - self.time.start;
        self.time.end = Some(end);
        self.time.diff = Some(diff);
        self.time.human = Some(durations.seconds_to_human(diff, None));
    }

    pub(crate) fn finish_memory(&mut self, end: i64, bytes: &dyn Fn(i64) -> String) {
        let diff = end - self.memory_baseline();
        self.memory.end = Some(end);
        self.memory.diff = Some(diff);
        self.memory.human = Some(bytes(diff));
    }

    /// Append a checkpoint for samples `time_end`/`memory_end`.
    ///
    /// From the second checkpoint on, both `human` fields describe the
    /// distance to the previous checkpoint while `diff_from_start` keeps the
    /// distance to the timer start.
    pub(crate) fn push_checkpoint(
        &mut self,
        description: Option<String>,
        time_end: f64,
        memory_end: i64,
        durations: &DurationFormatter,
        bytes: &dyn Fn(i64) -> String,
    ) -> &Checkpoint {
        let time_from_start = time_end - self.time.start;
        let memory_from_start = memory_end - self.memory_baseline();

        let mut checkpoint = Checkpoint {
            description,
            time: CheckpointTime {
                end: time_end,
                diff_from_start: time_from_start,
                human: durations.seconds_to_human(time_from_start, None),
                diff_from_last_checkpoint: None,
            },
            memory: CheckpointMemory {
                end: memory_end,
                diff_from_start: memory_from_start,
                human: bytes(memory_from_start),
                diff_from_last_checkpoint: None,
            },
        };

        if let Some(previous) = self.checkpoints.last() {
            let time_from_last = time_end - previous.time.end;
            checkpoint.time.diff_from_last_checkpoint = Some(time_from_last);
            checkpoint.time.human = durations.seconds_to_human(time_from_last, None);

            let memory_from_last = memory_end - previous.memory.end;
            checkpoint.memory.diff_from_last_checkpoint = Some(memory_from_last);
            checkpoint.memory.human = bytes(memory_from_last);
        }

        self.checkpoints.push(checkpoint);
        &self.checkpoints[self.checkpoints.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{format_bytes, UnitNames};

    fn english() -> DurationFormatter {
        DurationFormatter::new(UnitNames::english())
    }

    #[test]
    fn finish_computes_diffs() {
        let mut entry = TimerEntry::started(None, 10.0, 500);
        entry.finish_time(75.0, &english());
        entry.finish_memory(300, &format_bytes);

        assert!(entry.is_stopped());
        assert_eq!(entry.time.diff, Some(65.0));
        assert_eq!(entry.time.human.as_deref(), Some("a minute, 5 seconds"));
        assert_eq!(entry.memory.diff, Some(-200));
        assert_eq!(entry.memory.human.as_deref(), Some("-200 B"));
    }

    #[test]
    fn fallback_memory_baseline_is_zero() {
        let mut entry = TimerEntry::fallback(0.0);
        entry.finish_memory(2048, &format_bytes);
        assert_eq!(entry.memory.start, None);
        assert_eq!(entry.memory.diff, Some(2048));
        assert_eq!(entry.description.as_deref(), Some(FALLBACK_DESCRIPTION));
    }

    #[test]
    fn later_checkpoints_overwrite_human_with_since_last() {
        let durations = english();
        let mut entry = TimerEntry::started(None, 0.0, 0);
        entry.push_checkpoint(None, 120.0, 10, &durations, &format_bytes);
        let second = entry
            .push_checkpoint(Some("b".into()), 125.0, 4, &durations, &format_bytes)
            .clone();

        let first = &entry.checkpoints[0];
        assert_eq!(first.time.human, "2 minutes");
        assert_eq!(first.time.diff_from_last_checkpoint, None);
        assert_eq!(first.reported_time_diff(), 120.0);

        assert_eq!(second.time.diff_from_start, 125.0);
        assert_eq!(second.time.diff_from_last_checkpoint, Some(5.0));
        assert_eq!(second.time.human, "5 seconds");
        assert_eq!(second.memory.diff_from_start, 4);
        assert_eq!(second.memory.diff_from_last_checkpoint, Some(-6));
        assert_eq!(second.memory.human, "-6 B");
        assert_eq!(second.reported_time_diff(), 5.0);
    }

    #[test]
    fn first_checkpoint_serializes_without_since_last() {
        let mut entry = TimerEntry::started(None, 0.0, 0);
        entry.push_checkpoint(None, 1.0, 1, &english(), &format_bytes);

        let json = serde_json::to_string(&entry.checkpoints[0]).unwrap();
        assert!(!json.contains("diff_from_last_checkpoint"));
        assert!(json.starts_with(r#"{"description":null,"time":{"end":1.0,"diff_from_start":1.0"#));
    }
}
