//! Scripted samplers and store constructors shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use timekeep::{MemorySink, TimerConfig, TimerStore, UnitNames};

/// Instant used as the process start in test stores.
pub const PROCESS_START: f64 = 50.0;

/// Yields `samples` in order, repeating the last one once exhausted.
pub fn scripted<T>(samples: &[T]) -> impl Fn() -> T + Send + 'static
where
    T: Copy + Send + 'static,
{
    assert!(!samples.is_empty(), "a script needs at least one sample");
    let queue = Arc::new(Mutex::new(samples.iter().copied().collect::<VecDeque<T>>()));
    move || {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue[0]
        }
    }
}

/// English-locale config anchored at [`PROCESS_START`].
pub fn test_config() -> TimerConfig {
    TimerConfig::default()
        .with_process_start(PROCESS_START)
        .with_units(UnitNames::english())
}

/// Enabled store driven by scripted clock and memory samples.
pub fn scripted_store(clock: &[f64], memory: &[i64], sink: MemorySink) -> TimerStore {
    TimerStore::builder(test_config())
        .switch(true)
        .clock(scripted(clock))
        .memory(scripted(memory))
        .sink(sink)
        .build()
}

/// Clock samples of the build scenario with binary-exact fractions.
pub const BUILD_CLOCK: [f64; 4] = [100.0, 100.5, 101.25, 102.0];

/// Clock samples whose second checkpoint gap is not exact in binary.
pub const LINKED_AT_101_2: [f64; 4] = [100.0, 100.5, 101.2, 102.0];

/// Memory samples of the build scenario.
pub const BUILD_MEMORY: [i64; 4] = [1000, 1200, 1100, 1050];

/// Store for the build scenario: start at 100.0, checkpoints at 100.5 and
/// 101.25, stop at 102.0.
pub fn build_scenario(sink: MemorySink) -> TimerStore {
    build_scenario_with(&BUILD_CLOCK, sink)
}

/// The build scenario (start, "parsed", "linked", stop) over `clock`.
pub fn build_scenario_with(clock: &[f64], sink: MemorySink) -> TimerStore {
    let mut timers = scripted_store(clock, &BUILD_MEMORY, sink);
    timers.start("build", Some("compile step"));
    timers.checkpoint("build", Some("parsed"));
    timers.checkpoint("build", Some("linked"));
    timers.stop("build");
    timers
}

/// Remove the line breaks and indentation inserted by the pretty-printer.
pub fn compact(pretty: &str) -> String {
    pretty.chars().filter(|c| *c != '\n' && *c != '\t').collect()
}
