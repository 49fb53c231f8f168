//! Store configuration

use std::env;
use std::path::PathBuf;

use crate::format::{UnitNames, DEFAULT_INDENT};
use crate::sampler::DEFAULT_ENABLE_VAR;
use crate::sink::DEFAULT_LOG_DIR;

/// Variable overriding [`TimerConfig::log_dir`].
pub const LOG_DIR_VAR: &str = "TIMEKEEP_LOG_DIR";
/// Variable selecting the duration locale (`ro`, `en`).
pub const LOCALE_VAR: &str = "TIMEKEEP_LOCALE";
/// Variable overriding the dump indent unit.
pub const INDENT_VAR: &str = "TIMEKEEP_INDENT";

/// Configuration parameters for a [`TimerStore`](crate::TimerStore)
#[derive(Debug, Clone, PartialEq)]
pub struct TimerConfig {
    /// Directory receiving `timer-<date>.log` files
    pub log_dir: PathBuf,

    /// Indent unit for pretty-printed dumps
    pub indent: String,

    /// Nouns used in duration text
    pub units: UnitNames,

    /// Instant the host process started; anchors never-started timers.
    /// When unset, such timers are anchored at the moment they are read.
    pub process_start: Option<f64>,

    /// Environment variable switching instrumentation on
    pub enable_var: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            indent: DEFAULT_INDENT.to_string(),
            units: UnitNames::default(),
            process_start: None,
            enable_var: DEFAULT_ENABLE_VAR.to_string(),
        }
    }
}

impl TimerConfig {
    /// Defaults overridden by `TIMEKEEP_LOG_DIR`, `TIMEKEEP_LOCALE` and
    /// `TIMEKEEP_INDENT`. Unknown locales keep the default table.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env::var_os(LOG_DIR_VAR).filter(|dir| !dir.is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }

        if let Ok(code) = env::var(LOCALE_VAR) {
            match UnitNames::for_locale(&code) {
                Some(units) => config.units = units,
                None => tracing::warn!(locale = %code, "unknown locale, keeping default units"),
            }
        }

        if let Ok(indent) = env::var(INDENT_VAR) {
            config.indent = indent;
        }

        config
    }

    /// Anchor never-started timers at `start`.
    pub fn with_process_start(mut self, start: f64) -> Self {
        self.process_start = Some(start);
        self
    }

    /// Write log files under `dir`.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Use `units` for duration text.
    pub fn with_units(mut self, units: UnitNames) -> Self {
        self.units = units;
        self
    }
}
