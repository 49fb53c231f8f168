//! Enablement switches for timer instrumentation.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Environment variable consulted by [`EnvSwitch::default`].
pub const DEFAULT_ENABLE_VAR: &str = "APP_ACTIVITY_LOG_ACTIVE";

/// Gate for all instrumentation. Queried on every store operation.
pub trait Switch {
    /// Whether instrumentation is currently on.
    fn is_enabled(&self) -> bool;
}

impl Switch for bool {
    fn is_enabled(&self) -> bool {
        *self
    }
}

impl Switch for Arc<AtomicBool> {
    fn is_enabled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Reads an environment variable on every query.
///
/// `1`, `true`, `yes` and `on` (any case) enable instrumentation; anything
/// else, including an unset variable, disables it.
#[derive(Debug, Clone)]
pub struct EnvSwitch {
    var: String,
}

impl EnvSwitch {
    /// Switch bound to `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable being read.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSwitch {
    fn default() -> Self {
        Self::new(DEFAULT_ENABLE_VAR)
    }
}

impl Switch for EnvSwitch {
    fn is_enabled(&self) -> bool {
        env::var(&self.var)
            .map(|value| is_truthy(&value))
            .unwrap_or(false)
    }
}

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
