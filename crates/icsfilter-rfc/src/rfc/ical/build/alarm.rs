//! VALARM reminder blocks (RFC 5545 §3.6.6).

use chrono::NaiveDate;

use crate::rfc::filter::model::DayReminder;
use crate::rfc::ical::core::{ComponentSpan, names};
use crate::rfc::ical::parse::{LineStore, top_level_properties};
use crate::rfc::ical::time::TemporalContext;

/// Reminders configured for one calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReminderPlan {
    /// Minutes before the start of timed components.
    pub minutes: Option<i64>,
    /// Clock time for date-only components.
    pub day: Option<DayReminder>,
    /// Add the day reminder to timed components too.
    pub both: bool,
}

impl ReminderPlan {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.minutes.is_none() && self.day.is_none()
    }
}

/// `TRIGGER` line for a reminder `minutes` before the start.
#[must_use]
pub fn relative_trigger(minutes: i64) -> String {
    format!("TRIGGER:-PT{}M", minutes.unsigned_abs())
}

/// `TRIGGER` line for a reminder at a local clock time on or before `date`.
#[must_use]
pub fn absolute_trigger(date: NaiveDate, reminder: DayReminder) -> String {
    let date = if reminder.previous_day {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    };
    format!(
        "TRIGGER;VALUE=DATE-TIME:{}",
        date.and_time(reminder.time).format("%Y%m%dT%H%M%S")
    )
}

/// The four lines of an audio alarm with the given trigger line.
#[must_use]
pub fn alarm_block(trigger: String) -> [String; 4] {
    [
        "BEGIN:VALARM".to_string(),
        trigger,
        "ACTION:AUDIO".to_string(),
        "END:VALARM".to_string(),
    ]
}

/// ## Summary
/// Inserts the planned reminders before the END line of `span`.
///
/// Only VEVENT and VTODO components get alarms. A component whose start
/// has a time of day gets the relative reminder; one without a time of day
/// gets the day reminder, and so does a timed one when `plan.both` is set.
///
/// Returns the number of lines inserted; `span.end` and every later index
/// move down by that much.
pub fn add_alarms(
    store: &mut LineStore,
    span: &ComponentSpan,
    plan: &ReminderPlan,
    temporal: &TemporalContext,
) -> usize {
    if plan.is_empty() || !span.kind().allows_alarms() {
        return 0;
    }

    let Some((line, start)) = top_level_properties(store, span)
        .into_iter()
        .find(|(_, property)| property.is(names::DTSTART))
    else {
        tracing::warn!(line = span.start, component = %span.type_name, "No start time, reminder not added");
        return 0;
    };

    let start = match temporal.interpret(&start) {
        Ok(start) => start,
        Err(e) => {
            tracing::warn!(error = %e.at_line(line), "Invalid start time, reminder not added");
            return 0;
        }
    };

    let mut lines: Vec<String> = Vec::new();
    if start.has_time_component()
        && let Some(minutes) = plan.minutes
    {
        lines.extend(alarm_block(relative_trigger(minutes)));
    }
    if (!start.has_time_component() || plan.both)
        && let Some(day) = plan.day
    {
        lines.extend(alarm_block(absolute_trigger(start.date, day)));
    }

    let inserted = store.insert_block(span.end, &lines);
    tracing::debug!(line = span.start, component = %span.type_name, inserted, "Added reminders");
    inserted
}

#[cfg(test)]
#[path = "alarm_tests.rs"]
mod tests;
