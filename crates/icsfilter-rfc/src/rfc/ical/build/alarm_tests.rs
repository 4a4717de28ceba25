//! Tests for reminder insertion.

use super::*;
use crate::rfc::ical::parse::span_at;
use crate::rfc::ical::time::LocalZone;
use chrono::NaiveTime;

fn ctx() -> TemporalContext {
    TemporalContext::fixed(
        LocalZone::Fixed(chrono_tz::Tz::Europe__Helsinki),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    )
}

fn component(kind: &str, start: &str) -> (LineStore, ComponentSpan) {
    let text = format!("BEGIN:{kind}\r\nSUMMARY:Peli\r\n{start}\r\nEND:{kind}\r\n");
    let mut store = LineStore::split(&text);
    store.unfold();
    let span = span_at(&store, 0).unwrap();
    (store, span)
}

fn six_pm(previous_day: bool) -> DayReminder {
    DayReminder {
        time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        previous_day,
    }
}

fn lines(store: &LineStore) -> Vec<&str> {
    store.records().map(|r| r.working).collect()
}

#[test]
fn triggers() {
    assert_eq!(relative_trigger(30), "TRIGGER:-PT30M");
    assert_eq!(relative_trigger(-45), "TRIGGER:-PT45M");

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    assert_eq!(
        absolute_trigger(date, six_pm(false)),
        "TRIGGER;VALUE=DATE-TIME:20240601T180000"
    );
    assert_eq!(
        absolute_trigger(date, six_pm(true)),
        "TRIGGER;VALUE=DATE-TIME:20240531T180000"
    );
}

#[test]
fn relative_reminder_for_timed_event() {
    let (mut store, span) = component("VEVENT", "DTSTART:20240615T190000");
    let plan = ReminderPlan {
        minutes: Some(30),
        day: Some(six_pm(false)),
        both: false,
    };
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 4);
    assert_eq!(
        lines(&store)[3..8],
        [
            "BEGIN:VALARM",
            "TRIGGER:-PT30M",
            "ACTION:AUDIO",
            "END:VALARM",
            "END:VEVENT"
        ]
    );
}

#[test]
fn both_reminders_for_timed_event() {
    let (mut store, span) = component("VTODO", "DTSTART:20240615T190000");
    let plan = ReminderPlan {
        minutes: Some(30),
        day: Some(six_pm(true)),
        both: true,
    };
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 8);
    let lines = lines(&store);
    assert_eq!(lines[4], "TRIGGER:-PT30M");
    assert_eq!(lines[8], "TRIGGER;VALUE=DATE-TIME:20240614T180000");
    assert_eq!(lines[11], "END:VTODO");
}

#[test]
fn day_reminder_for_date_only_event() {
    let (mut store, span) = component("VEVENT", "DTSTART;VALUE=DATE:20240615");
    let plan = ReminderPlan {
        minutes: Some(30),
        day: Some(six_pm(false)),
        both: false,
    };
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 4);
    assert_eq!(lines(&store)[4], "TRIGGER;VALUE=DATE-TIME:20240615T180000");
}

#[test]
fn nothing_without_matching_reminder() {
    let (mut store, span) = component("VEVENT", "DTSTART;VALUE=DATE:20240615");
    let plan = ReminderPlan {
        minutes: Some(30),
        ..ReminderPlan::default()
    };
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 0);
    assert_eq!(store.len(), 5);
}

#[test]
fn no_alarms_outside_events_and_todos() {
    let (mut store, span) = component("VJOURNAL", "DTSTART:20240615T190000");
    let plan = ReminderPlan {
        minutes: Some(30),
        ..ReminderPlan::default()
    };
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 0);
}

#[test_log::test]
fn missing_or_invalid_start_skips_alarm() {
    let plan = ReminderPlan {
        minutes: Some(30),
        day: Some(six_pm(false)),
        both: true,
    };

    let (mut store, span) = component("VEVENT", "LOCATION:Kenttä");
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 0);

    let (mut store, span) = component("VEVENT", "DTSTART:huomenna");
    assert_eq!(add_alarms(&mut store, &span, &plan, &ctx()), 0);
    assert_eq!(store.len(), 5);
}
