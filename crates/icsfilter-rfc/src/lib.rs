//! Rule-driven filtering of iCalendar feeds.
//!
//! [`IcsFilter`] takes a calendar label, raw calendar text and a JSON rule
//! document, and returns the calendar with unwanted components removed and
//! reminders added to the rest.

pub mod error;
pub mod rfc;

pub use rfc::filter::{EngineOptions, FilterDocument, IcsFilter, filter_ics};
