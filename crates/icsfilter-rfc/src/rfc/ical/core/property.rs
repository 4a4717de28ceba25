//! iCalendar content line type (RFC 5545 §3.1).

use super::Parameter;

/// One logical (unfolded) line split into name, parameters and raw value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string, everything after the separating colon.
    pub raw_value: String,
}

impl ContentLine {
    /// Creates a content line, uppercasing the name.
    #[must_use]
    pub fn with_params(
        name: impl Into<String>,
        params: Vec<Parameter>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params,
            raw_value: value.into(),
        }
    }

    /// Returns whether this line has the given property name (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the value of the first parameter with the given name.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.is(name))
            .map(|p| p.value.as_str())
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value(names::TZID)
    }
}

/// Property and marker names the filter refers to.
pub mod names {
    pub const BEGIN: &str = "BEGIN";
    pub const END: &str = "END";

    pub const DTSTART: &str = "DTSTART";
    pub const TZID: &str = "TZID";

    /// Calendar property used to identify a feed when a rule has no label match.
    pub const X_WR_CALNAME: &str = "X-WR-CALNAME";
}
