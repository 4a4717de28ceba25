//! Tests for property matching.

use super::*;
use crate::rfc::filter::quorum::Fraction;
use crate::rfc::ical::parse::parse_content_line;
use crate::rfc::ical::time::LocalZone;
use chrono_tz::Tz;
use serde_json::json;

fn helsinki() -> TemporalContext {
    TemporalContext::fixed(
        LocalZone::Fixed(Tz::Europe__Helsinki),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    )
}

fn rule(value_type: ValueType, percent: f64, criteria: &[(&str, Value)]) -> PropertyRule {
    PropertyRule {
        property_name: "ANY".into(),
        value_type,
        required_fraction: Fraction::from_percent(percent).unwrap(),
        values: criteria
            .iter()
            .map(|(criteria, literal)| ValueCriterion {
                operator: Operator::parse(criteria),
                literal: literal.clone(),
            })
            .collect(),
    }
}

fn check(rule: &PropertyRule, line: &str) -> MatchOutcome {
    let ctx = helsinki();
    let property = parse_content_line(line).unwrap();
    PropertyMatcher::new(&ctx, false).evaluate(Some(rule), &property, 0)
}

#[test]
fn no_rule() {
    let ctx = helsinki();
    let property = parse_content_line("SUMMARY:x").unwrap();
    let outcome = PropertyMatcher::new(&ctx, false).evaluate(None, &property, 3);
    assert_eq!(outcome, MatchOutcome::NoRule);
}

#[test]
fn string_substring_ignores_case() {
    let r = rule(ValueType::String, 0.0, &[("s", json!("OTTELU"))]);
    assert_eq!(check(&r, "CLASS:Jalkapallo-ottelu"), MatchOutcome::Matched);
    assert_eq!(check(&r, "CLASS:Harjoitus"), MatchOutcome::NotMatched);

    let r = rule(ValueType::String, 0.0, &[("!s", json!("ottelu"))]);
    assert_eq!(check(&r, "CLASS:Harjoitus"), MatchOutcome::Matched);
}

#[test]
fn string_equality() {
    let r = rule(ValueType::String, 0.0, &[("=", json!("public"))]);
    assert_eq!(check(&r, "CLASS:PUBLIC"), MatchOutcome::Matched);
    let r = rule(ValueType::String, 0.0, &[("<>", json!("public"))]);
    assert_eq!(check(&r, "CLASS:PUBLIC"), MatchOutcome::NotMatched);
}

#[test]
fn half_of_three_criteria() {
    let two = rule(
        ValueType::String,
        50.0,
        &[("s", json!("jalka")), ("s", json!("ottelu")), ("s", json!("tennis"))],
    );
    assert_eq!(check(&two, "SUMMARY:Jalkapallo-ottelu"), MatchOutcome::Matched);

    let one = rule(
        ValueType::String,
        50.0,
        &[("s", json!("jalka")), ("s", json!("golf")), ("s", json!("tennis"))],
    );
    assert_eq!(check(&one, "SUMMARY:Jalkapallo-ottelu"), MatchOutcome::NotMatched);
}

#[test]
fn all_criteria_required() {
    let r = rule(
        ValueType::String,
        100.0,
        &[("s", json!("jalka")), ("s", json!("golf"))],
    );
    assert_eq!(check(&r, "SUMMARY:Jalkapallo"), MatchOutcome::NotMatched);
    let r = rule(
        ValueType::String,
        100.0,
        &[("s", json!("jalka")), ("s", json!("pallo"))],
    );
    assert_eq!(check(&r, "SUMMARY:Jalkapallo"), MatchOutcome::Matched);
}

#[test_log::test]
fn numbers() {
    let r = rule(ValueType::Number, 0.0, &[(">", json!(3))]);
    assert_eq!(check(&r, "PRIORITY:5"), MatchOutcome::Matched);
    assert_eq!(check(&r, "PRIORITY:high"), MatchOutcome::NotMatched);

    let r = rule(ValueType::Number, 0.0, &[("<=", json!("4"))]);
    assert_eq!(check(&r, "PRIORITY:5"), MatchOutcome::NotMatched);

    let r = rule(ValueType::Number, 0.0, &[("=", json!("many"))]);
    assert_eq!(check(&r, "PRIORITY:5"), MatchOutcome::NoRule);
}

#[test]
fn dates_use_current_year() {
    let r = rule(ValueType::Date, 0.0, &[(">", json!("1.6."))]);
    assert_eq!(check(&r, "DTSTART:20240615T190000"), MatchOutcome::Matched);

    let r = rule(ValueType::Date, 0.0, &[("=", json!("6/15"))]);
    assert_eq!(check(&r, "DTSTART;VALUE=DATE:20240615"), MatchOutcome::Matched);

    let r = rule(ValueType::Date, 0.0, &[("<", json!("31.5."))]);
    assert_eq!(check(&r, "DTSTART:20240615T190000"), MatchOutcome::NotMatched);

    // other years never equal a literal in the current year
    let r = rule(ValueType::Date, 0.0, &[("=", json!("15.6."))]);
    assert_eq!(check(&r, "DTSTART:20230615T190000"), MatchOutcome::NotMatched);
}

#[test_log::test]
fn days_of_week() {
    // 2024-06-15 is a Saturday
    let r = rule(ValueType::Day, 0.0, &[("=", json!(6))]);
    assert_eq!(check(&r, "DTSTART:20240615T190000"), MatchOutcome::Matched);

    let r = rule(ValueType::Day, 100.0, &[("!=", json!("2")), (">=", json!(6))]);
    assert_eq!(check(&r, "DTSTART:20240615T190000"), MatchOutcome::Matched);

    let r = rule(ValueType::Day, 0.0, &[("=", json!(9))]);
    assert_eq!(check(&r, "DTSTART:20240615T190000"), MatchOutcome::NoRule);
}

#[test]
fn days_are_taken_after_conversion_to_local_time() {
    // Saturday 22:00 UTC is Sunday 01:00 in Helsinki
    let sunday = rule(ValueType::Day, 0.0, &[("=", json!(7))]);
    assert_eq!(check(&sunday, "DTSTART:20240615T220000Z"), MatchOutcome::Matched);

    let saturday = rule(ValueType::Day, 0.0, &[("=", json!(6))]);
    assert_eq!(check(&saturday, "DTSTART:20240615T220000Z"), MatchOutcome::NotMatched);
}

#[test]
fn decimal_day_literal() {
    let r = rule(ValueType::Day, 0.0, &[("=", json!(3.0))]);
    assert_eq!(check(&r, "DTSTART:20240619T180000"), MatchOutcome::Matched);
}

#[test]
fn times_of_day() {
    let r = rule(ValueType::Time, 0.0, &[("=", json!("19:00"))]);
    assert_eq!(check(&r, "DTSTART:20240615T190000"), MatchOutcome::Matched);

    let r = rule(ValueType::Time, 0.0, &[("<", json!("08:00"))]);
    assert_eq!(check(&r, "DTSTART;VALUE=DATE:20240615"), MatchOutcome::Matched);
}

#[test]
fn times_are_compared_in_local_zone() {
    let r = rule(ValueType::Time, 0.0, &[("=", json!("19:00"))]);
    assert_eq!(
        check(&r, "DTSTART;TZID=America/New_York:20240615T120000"),
        MatchOutcome::Matched
    );
    assert_eq!(check(&r, "DTSTART:20240615T160000Z"), MatchOutcome::Matched);
}

#[test_log::test]
fn invalid_property_time_does_not_match() {
    let r = rule(ValueType::Date, 0.0, &[("!=", json!("1.1."))]);
    assert_eq!(check(&r, "DTSTART:tomorrow"), MatchOutcome::NotMatched);
}

#[test_log::test]
fn unusable_criteria() {
    let r = rule(ValueType::String, 0.0, &[("~", json!("ottelu"))]);
    assert_eq!(check(&r, "CLASS:ottelu"), MatchOutcome::NotMatched);

    let r = rule(ValueType::String, 0.0, &[("=", json!(5)), ("s", json!(null))]);
    assert_eq!(check(&r, "CLASS:5"), MatchOutcome::NoRule);

    let r = rule(ValueType::String, 0.0, &[]);
    assert_eq!(check(&r, "CLASS:5"), MatchOutcome::NoRule);
}

#[test_log::test]
fn misapplied_operators_are_best_effort() {
    let r = rule(ValueType::String, 0.0, &[("<", json!("m"))]);
    assert_eq!(check(&r, "LOCATION:Helsinki"), MatchOutcome::Matched);

    let r = rule(ValueType::Number, 0.0, &[("s", json!(5))]);
    assert_eq!(check(&r, "PRIORITY:15"), MatchOutcome::Matched);
}

#[test]
fn date_literal_forms() {
    let d = |s: &str| date_literal(&json!(s), 2024);
    assert_eq!(d("15.8."), NaiveDate::from_ymd_opt(2024, 8, 15));
    assert_eq!(d("5.12"), NaiveDate::from_ymd_opt(2024, 12, 5));
    assert_eq!(d("8/15"), NaiveDate::from_ymd_opt(2024, 8, 15));
    assert_eq!(d("8/15/"), NaiveDate::from_ymd_opt(2024, 8, 15));
    assert_eq!(d("31.2."), None);
    assert_eq!(d("2024-08-15"), None);
    assert_eq!(date_literal(&json!(15), 2024), None);
}
