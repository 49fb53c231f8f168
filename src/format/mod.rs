//! Text rendering: durations, byte counts and indented dumps.

mod bytes;
mod duration;
mod pretty;

pub use bytes::format_bytes;
pub use duration::{DurationFormatter, DurationParts, UnitName, UnitNames, UNIT_SEPARATOR};
pub use pretty::{pretty_print, pretty_print_with, DEFAULT_INDENT};
