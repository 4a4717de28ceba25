//! Timezone resolution for iCalendar `TZID` parameters.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::str::FromStr;

/// Error during timezone conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Resolver for timezone identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeZoneResolver;

impl TimeZoneResolver {
    /// Creates a new timezone resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// ## Summary
    /// Resolves a timezone identifier to a `chrono_tz::Tz`.
    ///
    /// The TZID is normalized first, so Windows zone names, IANA aliases and
    /// `/mozilla.org/`-style prefixed names resolve to their canonical zone.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
    #[expect(clippy::unused_self, reason = "ICU compiled data needs no per-resolver state")]
    pub fn resolve(&self, tzid: &str) -> Result<Tz, ConversionError> {
        let normalized = normalize_tzid(tzid.trim());

        Tz::from_str(&normalized).map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))
    }
}

/// Normalizes common CalDAV/iCalendar timezone identifiers to IANA names.
///
/// Uses ICU4X for Windows timezone ID mapping and IANA canonicalization.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let iana_parser = IanaParserExtended::new();

    if let Some(tz) = WindowsParser::new().parse(stripped, None) {
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    // handles aliases like Europe/Kiev -> Europe/Kyiv
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Interprets a wall-clock time in `tz` as an instant.
///
/// A time that occurs twice (DST fold) resolves to its first occurrence.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` for a wall-clock time skipped
/// by a DST gap.
pub fn zoned_to_utc(local_time: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local_time} in timezone {tz}"
        ))),
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
    }
}
