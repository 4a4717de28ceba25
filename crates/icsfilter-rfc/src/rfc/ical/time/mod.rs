//! Date and time interpretation of property values.
//!
//! - Timezone: `TZID` resolution and wall-clock to UTC conversion
//! - Local: normalization of date/date-time values to the local zone

mod local;
mod timezone;

pub use local::{LocalZone, PropertyTime, TemporalContext};
pub use timezone::{ConversionError, TimeZoneResolver, zoned_to_utc};
