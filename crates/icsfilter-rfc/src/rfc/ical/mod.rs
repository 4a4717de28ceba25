//! iCalendar (RFC 5545) text handling for the filter.
//!
//! - Core: content lines, parameters, component spans
//! - Parse: line buffers, content line reader, component scanner
//! - Time: date/date-time interpretation in the local zone
//! - Build: VALARM generation

pub mod build;
pub mod core;
pub mod parse;
pub mod time;
