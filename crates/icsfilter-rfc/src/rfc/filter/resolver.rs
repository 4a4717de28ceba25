//! Selecting the calendar rule for a calendar.

use super::model::{CalendarRule, FilterDocument};
use crate::rfc::ical::core::ContentLine;

/// ## Summary
/// Finds the rule for a calendar.
///
/// A rule whose `label` equals the caller's label wins. Otherwise the first
/// rule whose identifying property and value appear among the calendar's
/// own top-level properties is used. Both comparisons ignore case.
#[must_use]
pub fn resolve_calendar<'d>(
    document: &'d FilterDocument,
    label: &str,
    properties: &[(usize, ContentLine)],
) -> Option<&'d CalendarRule> {
    if let Some(rule) = document.calendars.iter().find(|rule| rule.has_label(label)) {
        tracing::debug!(label = %label, "Found filter for calendar by label");
        return Some(rule);
    }

    let rule = document.calendars.iter().find(|rule| {
        rule.identity().is_some_and(|(name, value)| {
            properties.iter().any(|(_, property)| {
                property.is(name) && property.raw_value.to_lowercase() == value.to_lowercase()
            })
        })
    });

    match rule.and_then(CalendarRule::identity) {
        Some((name, value)) => {
            tracing::debug!(property = %name, value = %value, "Found filter for calendar by property");
        }
        None => tracing::debug!(label = %label, "No filter for calendar"),
    }
    rule
}
