//! Duration decomposition into localized, comma-joined text.

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 60.0 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: f64 = 24.0 * SECONDS_PER_HOUR;

/// Separator placed between rendered units.
pub const UNIT_SEPARATOR: &str = ", ";

/// Singular and plural noun for a single time unit.
///
/// The singular form is used verbatim (it carries its own article, e.g.
/// `"a day"`), the plural form is prefixed with the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitName {
    /// Text used when the count is exactly one.
    pub singular: String,
    /// Noun appended after the count otherwise.
    pub plural: String,
}

impl UnitName {
    /// Build a unit name from its two forms.
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    fn render(&self, count: u64) -> String {
        if count == 1 {
            self.singular.clone()
        } else {
            format!("{} {}", count, self.plural)
        }
    }
}

/// Locale table mapping each unit kind to its nouns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNames {
    /// Days.
    pub day: UnitName,
    /// Hours.
    pub hour: UnitName,
    /// Minutes.
    pub minute: UnitName,
    /// Seconds.
    pub second: UnitName,
}

impl UnitNames {
    /// Romanian nouns ("o zi", "2 zile", ...).
    pub fn romanian() -> Self {
        Self {
            day: UnitName::new("o zi", "zile"),
            hour: UnitName::new("o oră", "ore"),
            minute: UnitName::new("un minut", "minute"),
            second: UnitName::new("o secundă", "secunde"),
        }
    }

    /// English nouns ("a day", "2 days", ...).
    pub fn english() -> Self {
        Self {
            day: UnitName::new("a day", "days"),
            hour: UnitName::new("an hour", "hours"),
            minute: UnitName::new("a minute", "minutes"),
            second: UnitName::new("a second", "seconds"),
        }
    }

    /// Resolve a locale code (`ro`, `en`, case-insensitive, region suffix ignored).
    pub fn for_locale(code: &str) -> Option<Self> {
        let lang = code
            .split(|c: char| c == '_' || c == '-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "ro" => Some(Self::romanian()),
            "en" => Some(Self::english()),
            _ => None,
        }
    }
}

impl Default for UnitNames {
    fn default() -> Self {
        Self::romanian()
    }
}

/// Whole-unit breakdown of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    /// Whole days.
    pub days: u64,
    /// Whole hours below a day.
    pub hours: u64,
    /// Whole minutes below an hour.
    pub minutes: u64,
    /// Remaining seconds, rounded up.
    pub seconds: u64,
}

impl DurationParts {
    /// Split `total_seconds` into days, hours, minutes and seconds.
    ///
    /// The leftover below one minute is rounded up, so `0.2` yields one
    /// second and `59.5` yields sixty. Negative and non-finite input is zero.
    pub fn decompose(total_seconds: f64) -> Self {
        if !total_seconds.is_finite() || total_seconds <= 0.0 {
            return Self::default();
        }

        let days = (total_seconds / SECONDS_PER_DAY).floor();
        let mut rest = total_seconds - days * SECONDS_PER_DAY;

        let hours = (rest / SECONDS_PER_HOUR).floor();
        rest -= hours * SECONDS_PER_HOUR;

        let minutes = (rest / SECONDS_PER_MINUTE).floor();
        rest -= minutes * SECONDS_PER_MINUTE;

        Self {
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
            seconds: rest.max(0.0).ceil() as u64,
        }
    }
}

/// Renders elapsed seconds as text such as `"2 days, 3 hours"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationFormatter {
    units: UnitNames,
}

impl DurationFormatter {
    /// Formatter over the given locale table.
    pub fn new(units: UnitNames) -> Self {
        Self { units }
    }

    /// Locale table in use.
    pub fn units(&self) -> &UnitNames {
        &self.units
    }

    /// Render `total_seconds`, keeping only the first `limit_units`
    /// components when a limit is given.
    ///
    /// Zero-valued units are omitted; a zero duration renders as `""`.
    /// `Some(0)` keeps no component and also renders as `""`.
    pub fn seconds_to_human(&self, total_seconds: f64, limit_units: Option<usize>) -> String {
        let parts = DurationParts::decompose(total_seconds);

        let rendered: Vec<String> = [
            (parts.days, &self.units.day),
            (parts.hours, &self.units.hour),
            (parts.minutes, &self.units.minute),
            (parts.seconds, &self.units.second),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, name)| name.render(count))
        .collect();

        let full = rendered.join(UNIT_SEPARATOR);

        match limit_units {
            // chunked from the built text, not re-decomposed
            Some(limit) => full
                .split(UNIT_SEPARATOR)
                .take(limit)
                .collect::<Vec<_>>()
                .join(UNIT_SEPARATOR),
            None => full,
        }
    }
}
