//! Sampling seams: wall clock, process memory and the enablement switch.
//!
//! The store never reads the environment directly; it asks these traits,
//! so tests and embedders can script every sample.

mod clock;
mod memory;
mod switch;

pub use clock::{Clock, SystemClock};
pub use memory::{MemorySampler, ProcessMemory};
pub use switch::{EnvSwitch, Switch, DEFAULT_ENABLE_VAR};
