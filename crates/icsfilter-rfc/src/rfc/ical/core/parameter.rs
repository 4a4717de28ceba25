//! iCalendar parameter type (RFC 5545 §3.2).

/// A single property parameter, e.g. `TZID=Europe/Helsinki`.
///
/// Multiple comma-separated values are kept joined, so
/// `ROLE=REQ-PARTICIPANT,OPT-PARTICIPANT` has the value
/// `"REQ-PARTICIPANT,OPT-PARTICIPANT"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter value, quotes removed, comma-joined when multi-valued.
    pub value: String,
}

impl Parameter {
    /// Creates a new parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            value: value.into(),
        }
    }

    /// Returns whether this parameter has the given name (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
