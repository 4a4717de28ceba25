//! The filtering run: rule document and calendar text in, filtered text out.

use icsfilter_core::config::EngineConfig;
use icsfilter_core::constants::{DEFAULT_BOTH_REMINDERS, DEFAULT_SUM_NEGATIVE_MATCHES};

use super::evaluator::{ComponentEvaluator, Verdict};
use super::model::{CalendarRule, FilterDocument};
use super::resolver::resolve_calendar;
use crate::error::RfcResult;
use crate::rfc::ical::build::{ReminderPlan, add_alarms};
use crate::rfc::ical::core::{ComponentKind, ComponentSpan};
use crate::rfc::ical::parse::{
    ComponentPattern, LineStore, find_component, skip_component, span_at, top_level_properties,
};
use crate::rfc::ical::time::{LocalZone, TemporalContext};

/// Engine behaviour not covered by the rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// `bothReminders` for calendar rules that do not set it.
    pub both_reminders_default: bool,
    /// Whether failed matches subtract from quorum sums.
    pub sum_negative_matches: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            both_reminders_default: DEFAULT_BOTH_REMINDERS,
            sum_negative_matches: DEFAULT_SUM_NEGATIVE_MATCHES,
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            both_reminders_default: config.both_reminders_default,
            sum_negative_matches: config.sum_negative_matches,
        }
    }
}

/// Calendar filter engine.
#[derive(Debug, Clone, Default)]
pub struct IcsFilter {
    options: EngineOptions,
    temporal: TemporalContext,
}

impl IcsFilter {
    #[must_use]
    pub const fn new(options: EngineOptions, temporal: TemporalContext) -> Self {
        Self { options, temporal }
    }

    /// Engine configured from settings, with the configured local zone.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let local = LocalZone::named(config.local_timezone.as_deref());
        Self::new(config.into(), TemporalContext::new(local))
    }

    #[must_use]
    pub const fn options(&self) -> EngineOptions {
        self.options
    }

    /// ## Summary
    /// Filters calendar data for the calendar called `label`.
    ///
    /// Components are dropped or kept according to the calendar's rule and
    /// kept events and to-dos get the configured reminders. Output lines
    /// are CRLF-terminated. Bytes that are not valid UTF-8 are matched on
    /// their replacement text and written back as they arrived.
    ///
    /// This never fails: an empty label or a missing or unusable rule
    /// document returns `raw` unchanged.
    #[must_use]
    #[tracing::instrument(skip(self, raw, rules), fields(input_len = raw.len()))]
    pub fn filter(&self, label: &str, raw: &[u8], rules: Option<&str>) -> Vec<u8> {
        match self.try_filter(label, raw, rules) {
            Ok(Some(filtered)) => filtered,
            Ok(None) => raw.to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "Input passed through unfiltered");
                raw.to_vec()
            }
        }
    }

    fn try_filter(&self, label: &str, raw: &[u8], rules: Option<&str>) -> RfcResult<Option<Vec<u8>>> {
        if label.trim().is_empty() {
            tracing::debug!("No calendar label, input passed through");
            return Ok(None);
        }
        let Some(rules) = rules else {
            tracing::debug!("No rule document, input passed through");
            return Ok(None);
        };

        let document = FilterDocument::parse(rules)?;

        let mut store = LineStore::split(raw);
        store.unfold();
        self.filter_store(&mut store, label, &document);

        Ok(Some(store.render()))
    }

    /// Filters every calendar in `store`, one after the other.
    pub fn filter_store(&self, store: &mut LineStore, label: &str, document: &FilterDocument) {
        let mut cursor = 0;
        let mut calendars = 0;

        while let Some(found) = find_component(
            store,
            cursor,
            ComponentPattern::Named(ComponentKind::Calendar.as_str()),
            false,
        ) {
            let Some(calendar) = span_at(store, found.index) else {
                tracing::warn!(line = found.index, "Calendar END not found, rest of input unfiltered");
                break;
            };
            calendars += 1;
            cursor = self.filter_calendar(store, calendar, label, document) + 1;
        }

        if calendars == 0 {
            tracing::warn!(lines = store.len(), "No calendar found");
        }
    }

    /// Filters one calendar and returns the index of its END line.
    fn filter_calendar(
        &self,
        store: &mut LineStore,
        mut calendar: ComponentSpan,
        label: &str,
        document: &FilterDocument,
    ) -> usize {
        let properties = top_level_properties(store, &calendar);
        let Some(rule) = resolve_calendar(document, label, &properties) else {
            return calendar.end;
        };

        let plan = self.reminder_plan(rule);
        let evaluator =
            ComponentEvaluator::new(&self.temporal, self.options.sum_negative_matches);

        let mut i = calendar.start + 1;
        while i < calendar.end {
            let Some(component) = span_at(store, i) else {
                i += skip_component(store, i).max(1);
                continue;
            };

            match evaluator.evaluate(store, &component, rule.component_rule(&component.type_name)) {
                Verdict::Drop => {
                    for line in component.start..=component.end {
                        store.drop_line(line);
                    }
                    i = component.end + 1;
                    while i < calendar.end && store.is_placeholder(i) {
                        store.drop_line(i);
                        i += 1;
                    }
                }
                Verdict::Keep => {
                    let inserted = add_alarms(store, &component, &plan, &self.temporal);
                    calendar.grow(inserted);
                    i = component.end + inserted + 1;
                }
            }
        }

        calendar.end
    }

    fn reminder_plan(&self, rule: &CalendarRule) -> ReminderPlan {
        ReminderPlan {
            minutes: rule.reminder_minutes,
            day: rule.day_reminder,
            both: rule
                .both_reminders
                .unwrap_or(self.options.both_reminders_default),
        }
    }
}

/// ## Summary
/// Filters calendar text with default engine options and the system zone.
///
/// See [`IcsFilter::filter`].
#[must_use]
pub fn filter_ics(label: &str, raw: &[u8], rules: Option<&str>) -> Vec<u8> {
    IcsFilter::default().filter(label, raw, rules)
}
