//! Named timers with checkpoints
//!
//! A [`TimerStore`] owns every timer by name. Timers are opened with
//! [`start`](TimerStore::start), subdivided with
//! [`checkpoint`](TimerStore::checkpoint) and closed with
//! [`stop`](TimerStore::stop); [`dump`](TimerStore::dump) and
//! [`log`](TimerStore::log) close whatever is still open and persist the lot.
//!
//! Two behaviors are intentional even though they can surprise:
//! starting an existing name silently replaces it, and reading an unknown
//! name yields a fallback entry anchored at the process start instead of an
//! error. The fallback only becomes a stored timer once a checkpoint or stop
//! is recorded under that name.

mod entry;
mod report;

pub use entry::{
    Checkpoint, CheckpointMemory, CheckpointTime, MemoryStats, TimeStats, TimerEntry,
    FALLBACK_DESCRIPTION,
};
pub use report::{format_diff, format_timestamp};

use std::collections::HashMap;
use std::fmt;

use chrono::{Local, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, trace};

use crate::config::TimerConfig;
use crate::format::{format_bytes, pretty_print_with, DurationFormatter};
use crate::sampler::{Clock, EnvSwitch, MemorySampler, ProcessMemory, Switch, SystemClock};
use crate::sink::{DailyFileSink, LogSink};
use crate::Result;

type ByteFormatter = Box<dyn Fn(i64) -> String + Send>;

/// All timers at one instant, in start order.
///
/// Serializes as an object keyed by timer name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, TimerEntry)>,
}

impl Snapshot {
    /// Entry recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&TimerEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, entry)| entry)
    }

    /// Entries in start order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimerEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no timer was recorded (or instrumentation is off).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Multi-line human report, as appended by [`TimerStore::log`].
    pub fn report(&self) -> String {
        report::render(self)
    }

    /// Unwrap into `(name, entry)` pairs.
    pub fn into_entries(self) -> Vec<(String, TimerEntry)> {
        self.entries
    }
}

impl From<Vec<(String, TimerEntry)>> for Snapshot {
    fn from(entries: Vec<(String, TimerEntry)>) -> Self {
        Self { entries }
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// Assembles a [`TimerStore`] from a config and optional collaborators.
///
/// Anything not supplied is wired to the production default: an
/// [`EnvSwitch`] on `config.enable_var`, the wall clock, process RSS,
/// [`format_bytes`] and a [`DailyFileSink`] under `config.log_dir`.
pub struct TimerStoreBuilder {
    config: TimerConfig,
    switch: Option<Box<dyn Switch + Send>>,
    clock: Option<Box<dyn Clock + Send>>,
    memory: Option<Box<dyn MemorySampler + Send>>,
    bytes: Option<ByteFormatter>,
    sink: Option<Box<dyn LogSink + Send>>,
}

impl fmt::Debug for TimerStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerStoreBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TimerStoreBuilder {
    fn new(config: TimerConfig) -> Self {
        Self {
            config,
            switch: None,
            clock: None,
            memory: None,
            bytes: None,
            sink: None,
        }
    }

    /// Enablement switch.
    pub fn switch(mut self, switch: impl Switch + Send + 'static) -> Self {
        self.switch = Some(Box::new(switch));
        self
    }

    /// Timestamp source.
    pub fn clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Memory usage source.
    pub fn memory(mut self, memory: impl MemorySampler + Send + 'static) -> Self {
        self.memory = Some(Box::new(memory));
        self
    }

    /// Renderer for byte deltas.
    pub fn byte_formatter(mut self, bytes: impl Fn(i64) -> String + Send + 'static) -> Self {
        self.bytes = Some(Box::new(bytes));
        self
    }

    /// Destination of reports and dumps.
    pub fn sink(mut self, sink: impl LogSink + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Finish the store.
    pub fn build(self) -> TimerStore {
        let config = self.config;
        let switch = self
            .switch
            .unwrap_or_else(|| Box::new(EnvSwitch::new(config.enable_var.clone())));
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(DailyFileSink::new(config.log_dir.clone())));

        TimerStore {
            durations: DurationFormatter::new(config.units.clone()),
            switch,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            memory: self.memory.unwrap_or_else(|| Box::new(ProcessMemory)),
            bytes: self.bytes.unwrap_or_else(|| Box::new(format_bytes)),
            sink,
            config,
            timers: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// Process-local accumulator of named timers.
///
/// Single writer: every mutating operation takes `&mut self`.
pub struct TimerStore {
    config: TimerConfig,
    durations: DurationFormatter,
    switch: Box<dyn Switch + Send>,
    clock: Box<dyn Clock + Send>,
    memory: Box<dyn MemorySampler + Send>,
    bytes: ByteFormatter,
    sink: Box<dyn LogSink + Send>,
    timers: Vec<(String, TimerEntry)>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for TimerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerStore")
            .field("config", &self.config)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl TimerStore {
    /// Store wired to the production collaborators.
    pub fn new(config: TimerConfig) -> Self {
        Self::builder(config).build()
    }

    /// Start assembling a store.
    pub fn builder(config: TimerConfig) -> TimerStoreBuilder {
        TimerStoreBuilder::new(config)
    }

    /// Configuration the store was built with.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Current state of the enablement switch.
    pub fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    /// Number of stored timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// True when no timer is stored.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Stored timer names in start order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.timers.iter().map(|(name, _)| name.as_str())
    }

    /// Open a timer, replacing any timer already stored under `name`.
    pub fn start(&mut self, name: &str, description: Option<&str>) {
        if !self.is_enabled() {
            trace!(timer = name, "instrumentation disabled, start skipped");
            return;
        }

        let entry = TimerEntry::started(
            description.map(str::to_owned),
            self.clock.now(),
            self.memory.current_usage(),
        );
        self.insert(name, entry);
        debug!(timer = name, "timer started");
    }

    /// Record a checkpoint on `name`.
    ///
    /// An unknown name is resolved to the fallback entry, which is stored
    /// from here on.
    pub fn checkpoint(&mut self, name: &str, description: Option<&str>) {
        if !self.is_enabled() {
            trace!(timer = name, "instrumentation disabled, checkpoint skipped");
            return;
        }

        let time_end = self.clock.now();
        let memory_end = self.memory.current_usage();

        let slot = self.resolve(name);
        let (timers, durations, bytes) = (&mut self.timers, &self.durations, &self.bytes);
        let checkpoint = timers[slot].1.push_checkpoint(
            description.map(str::to_owned),
            time_end,
            memory_end,
            durations,
            &**bytes,
        );
        debug!(
            timer = name,
            elapsed = checkpoint.time.diff_from_start,
            "checkpoint recorded"
        );
    }

    /// Close `name` and return its finalized entry.
    ///
    /// `None` when instrumentation is disabled.
    pub fn stop(&mut self, name: &str) -> Option<TimerEntry> {
        if !self.is_enabled() {
            trace!(timer = name, "instrumentation disabled, stop skipped");
            return None;
        }

        let time_end = self.clock.now();
        let memory_end = self.memory.current_usage();

        let slot = self.resolve(name);
        let entry = &mut self.timers[slot].1;
        entry.finish_time(time_end, &self.durations);
        entry.finish_memory(memory_end, &*self.bytes);
        debug!(timer = name, elapsed = ?entry.time.diff, "timer stopped");

        Some(entry.clone())
    }

    /// Stored entry for `name`, or a fallback anchored at the process start.
    ///
    /// Never modifies the store.
    pub fn get(&self, name: &str) -> TimerEntry {
        match self.index.get(name) {
            Some(&slot) => self.timers[slot].1.clone(),
            None => self.fallback(),
        }
    }

    /// Close every open timer at a single shared instant and return all timers.
    ///
    /// With `to_file`, the snapshot is also serialized, indented and appended
    /// to today's log. Returns an empty snapshot when instrumentation is off.
    pub fn dump(&mut self, to_file: bool) -> Result<Snapshot> {
        if !self.is_enabled() {
            trace!("instrumentation disabled, dump skipped");
            return Ok(Snapshot::default());
        }

        let time_end = self.clock.now();
        let memory_end = self.memory.current_usage();

        for (_, entry) in self.timers.iter_mut() {
            if entry.time.end.is_none() {
                entry.finish_time(time_end, &self.durations);
            }
            if entry.memory.end.is_none() {
                entry.finish_memory(memory_end, &*self.bytes);
            }
        }

        let snapshot = Snapshot::from(self.timers.clone());
        if to_file {
            self.write_dump(&snapshot)?;
        }
        Ok(snapshot)
    }

    /// Close open timers and append the human report to today's log.
    ///
    /// Nothing is written when there are no timers.
    pub fn log(&mut self) -> Result<()> {
        if !self.is_enabled() {
            trace!("instrumentation disabled, log skipped");
            return Ok(());
        }

        let snapshot = self.dump(false)?;
        let report = snapshot.report();
        if report.is_empty() {
            return Ok(());
        }

        self.sink.append(today(), &report)?;
        info!(timers = snapshot.len(), "timer report appended");
        Ok(())
    }

    /// Drop every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.index.clear();
        debug!("timers cleared");
    }

    fn fallback(&self) -> TimerEntry {
        let start = self
            .config
            .process_start
            .unwrap_or_else(|| self.clock.now());
        TimerEntry::fallback(start)
    }

    /// Slot of `name`, storing the fallback entry first when it is unknown.
    fn resolve(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.index.get(name) {
            return slot;
        }
        debug!(timer = name, "unknown timer, using fallback entry");
        let entry = self.fallback();
        self.insert(name, entry)
    }

    fn insert(&mut self, name: &str, entry: TimerEntry) -> usize {
        match self.index.get(name) {
            Some(&slot) => {
                self.timers[slot].1 = entry;
                slot
            }
            None => {
                let slot = self.timers.len();
                self.timers.push((name.to_string(), entry));
                self.index.insert(name.to_string(), slot);
                slot
            }
        }
    }

    fn write_dump(&self, snapshot: &Snapshot) -> Result<()> {
        let compact = serde_json::to_string(snapshot)?;
        let pretty = pretty_print_with(&compact, &self.config.indent);
        self.sink.append(today(), &pretty)?;
        info!(timers = snapshot.len(), bytes = pretty.len(), "timer dump appended");
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
