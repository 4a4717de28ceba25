//! Local-time view of DATE and DATE-TIME property values (RFC 5545 §3.3.4-3.3.5).

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use super::timezone::{TimeZoneResolver, zoned_to_utc};
use crate::rfc::ical::core::ContentLine;
use crate::rfc::ical::parse::{ParseError, ParseErrorKind, ParseResult};

/// The zone that "local time" refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The operating system's zone.
    #[default]
    System,
    /// An explicitly configured zone.
    Fixed(Tz),
}

impl LocalZone {
    /// Resolves a configured zone name, falling back to the system zone.
    #[must_use]
    pub fn named(name: Option<&str>) -> Self {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Self::System;
        };
        match TimeZoneResolver::new().resolve(name) {
            Ok(tz) => Self::Fixed(tz),
            Err(e) => {
                tracing::warn!(zone = %name, error = %e, "Local timezone not available, using system zone");
                Self::System
            }
        }
    }

    /// Wall-clock time of `instant` in this zone.
    #[must_use]
    pub fn wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::System => instant.with_timezone(&Local).naive_local(),
            Self::Fixed(tz) => instant.with_timezone(&tz).naive_local(),
        }
    }

    /// Current date in this zone.
    #[must_use]
    pub fn today(self) -> NaiveDate {
        self.wall_clock(Utc::now()).date()
    }
}

/// A property value normalized to local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTime {
    pub date: NaiveDate,
    /// `None` for DATE values.
    pub time_of_day: Option<NaiveTime>,
}

impl PropertyTime {
    #[must_use]
    pub const fn has_time_component(&self) -> bool {
        self.time_of_day.is_some()
    }

    /// Time of day, midnight for DATE values.
    #[must_use]
    pub fn time_or_midnight(&self) -> NaiveTime {
        self.time_of_day.unwrap_or(NaiveTime::MIN)
    }
}

/// Zone the wall-clock digits of a value are expressed in.
#[derive(Debug, Clone, Copy)]
enum ValueZone {
    Utc,
    Zoned(Tz),
    Floating,
}

/// Local zone and current date for one filtering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalContext {
    pub local: LocalZone,
    pub today: NaiveDate,
}

impl Default for TemporalContext {
    fn default() -> Self {
        Self::new(LocalZone::System)
    }
}

impl TemporalContext {
    /// Context for `local`, with today's date taken from the clock.
    #[must_use]
    pub fn new(local: LocalZone) -> Self {
        Self {
            local,
            today: local.today(),
        }
    }

    /// Context with a fixed current date.
    #[must_use]
    pub const fn fixed(local: LocalZone, today: NaiveDate) -> Self {
        Self { local, today }
    }

    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.today.year()
    }

    /// ## Summary
    /// Interprets the DATE (`YYYYMMDD`) or DATE-TIME (`YYYYMMDDTHHMMSS[Z]`)
    /// value of `property` in local time.
    ///
    /// A trailing `Z` means UTC. Otherwise a resolvable `TZID` parameter names
    /// the source zone; an unresolvable one is reported and the value is
    /// treated as local, as are values without either. The year is everything
    /// before the last four digits of the date.
    ///
    /// ## Errors
    /// Returns [`ParseErrorKind::MissingValue`] for an empty value,
    /// [`ParseErrorKind::InvalidDate`] or [`ParseErrorKind::InvalidTime`] when
    /// the respective part is malformed or out of range.
    pub fn interpret(&self, property: &ContentLine) -> ParseResult<PropertyTime> {
        let value = property.raw_value.trim();
        if value.is_empty() {
            return Err(ParseError::new(ParseErrorKind::MissingValue, 1));
        }

        let (body, zone) = match value.strip_suffix('Z') {
            Some(body) => (body, ValueZone::Utc),
            None => (value, Self::zone_of(property)),
        };

        let (date_part, time_part) = match body.find(['T', 't']) {
            Some(sep) => (&body[..sep], Some(&body[sep + 1..])),
            None => (body, None),
        };

        let date = parse_date(date_part)?;
        let Some(time_part) = time_part else {
            return Ok(PropertyTime {
                date,
                time_of_day: None,
            });
        };
        let time = parse_time(time_part).map_err(|e| ParseError {
            column: date_part.len() + 2,
            ..e
        })?;

        let stamp = date.and_time(time);
        let local = match zone {
            ValueZone::Floating => stamp,
            ValueZone::Utc => self.local.wall_clock(stamp.and_utc()),
            ValueZone::Zoned(tz) => match zoned_to_utc(stamp, tz) {
                Ok(instant) => self.local.wall_clock(instant),
                Err(e) => {
                    tracing::warn!(value = %value, error = %e, "Cannot convert to local time, using value as is");
                    stamp
                }
            },
        };

        Ok(PropertyTime {
            date: local.date(),
            time_of_day: Some(local.time()),
        })
    }

    fn zone_of(property: &ContentLine) -> ValueZone {
        let Some(tzid) = property.tzid() else {
            return ValueZone::Floating;
        };
        match TimeZoneResolver::new().resolve(tzid) {
            Ok(tz) => ValueZone::Zoned(tz),
            Err(e) => {
                tracing::warn!(tzid = %tzid, error = %e, "Timezone not available, using local time");
                ValueZone::Floating
            }
        }
    }
}

/// Parses `Y+MMDD` where the year is at least one digit.
fn parse_date(s: &str) -> ParseResult<NaiveDate> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidDate, 1).with_context(s.to_string());

    if s.len() < 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let split = s.len() - 4;
    let year: i32 = s[..split].parse().map_err(|_e| invalid())?;
    let month: u32 = s[split..split + 2].parse().map_err(|_e| invalid())?;
    let day: u32 = s[split + 2..].parse().map_err(|_e| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parses `HHMMSS`.
fn parse_time(s: &str) -> ParseResult<NaiveTime> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidTime, 1).with_context(s.to_string());

    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = s[0..2].parse().map_err(|_e| invalid())?;
    let minute: u32 = s[2..4].parse().map_err(|_e| invalid())?;
    let second: u32 = s[4..6].parse().map_err(|_e| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
