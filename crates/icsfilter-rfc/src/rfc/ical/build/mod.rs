//! iCalendar content synthesized by the filter.
//!
//! - Alarm: VALARM reminder blocks spliced into kept components

mod alarm;

pub use alarm::{ReminderPlan, absolute_trigger, add_alarms, alarm_block, relative_trigger};
