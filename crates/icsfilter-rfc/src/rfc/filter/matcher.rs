//! Matching one property occurrence against a property rule.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_json::Value;

use super::model::{Operator, PropertyRule, ValueCriterion, ValueType, integer, number};
use super::quorum::{MatchOutcome, Quorum};
use crate::rfc::ical::core::ContentLine;
use crate::rfc::ical::parse::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::time::{PropertyTime, TemporalContext};

/// Evaluates property rules for one filtering run.
#[derive(Debug, Clone, Copy)]
pub struct PropertyMatcher<'a> {
    temporal: &'a TemporalContext,
    sum_negative: bool,
}

impl<'a> PropertyMatcher<'a> {
    #[must_use]
    pub const fn new(temporal: &'a TemporalContext, sum_negative: bool) -> Self {
        Self {
            temporal,
            sum_negative,
        }
    }

    /// ## Summary
    /// Checks `property`, read from buffer line `line`, against `rule`.
    ///
    /// Returns [`MatchOutcome::NoRule`] when there is no rule or none of its
    /// criteria had a usable literal, [`MatchOutcome::Matched`] when the
    /// rule's quorum of criteria holds, and [`MatchOutcome::NotMatched`]
    /// otherwise.
    #[must_use]
    pub fn evaluate(
        &self,
        rule: Option<&PropertyRule>,
        property: &ContentLine,
        line: usize,
    ) -> MatchOutcome {
        let Some(rule) = rule else {
            return MatchOutcome::NoRule;
        };

        let time = match rule.value_type {
            ValueType::Date | ValueType::Day | ValueType::Time => Some(
                self.temporal.interpret(property).inspect_err(|e| {
                        tracing::warn!(
                            error = %e.clone().at_line(line),
                            property = %property.name,
                            "Property value is not a time value"
                        );
                    }),
            ),
            ValueType::String | ValueType::Number => None,
        };

        let check = Check {
            temporal: self.temporal,
            property,
            line,
            time: time.as_ref(),
        };
        let tally = Quorum::new(rule.required_fraction, self.sum_negative)
            .evaluate(rule.values.iter().map(|c| check.criterion(rule.value_type, c)));

        let outcome = if tally.matched {
            MatchOutcome::Matched
        } else if tally.decisive {
            MatchOutcome::NotMatched
        } else {
            MatchOutcome::NoRule
        };

        tracing::debug!(
            line,
            property = %property.name,
            outcome = ?outcome,
            sum = tally.sum,
            checked = tally.checked,
            "Property checked"
        );
        outcome
    }
}

/// One property occurrence under evaluation.
struct Check<'a> {
    temporal: &'a TemporalContext,
    property: &'a ContentLine,
    line: usize,
    /// Interpreted value, for temporal rule types.
    time: Option<&'a ParseResult<PropertyTime>>,
}

impl Check<'_> {
    fn criterion(&self, value_type: ValueType, criterion: &ValueCriterion) -> MatchOutcome {
        let op = criterion.operator;
        let literal = &criterion.literal;

        match value_type {
            ValueType::String => self.string(op, literal.as_str()),
            // best effort: compare the raw text
            _ if op.is_some_and(Operator::is_substring) => {
                self.string(op, literal_text(literal).as_deref())
            }
            ValueType::Number => self.number(op, literal),
            ValueType::Date => {
                let expected = date_literal(literal, self.temporal.current_year());
                self.temporal_cmp(op, literal, expected, |t| t.date)
            }
            ValueType::Day => {
                let expected = integer(literal).filter(|day| (1..=7).contains(day));
                let actual = |t: &PropertyTime| i64::from(t.date.weekday().number_from_monday());
                self.temporal_cmp(op, literal, expected, actual)
            }
            ValueType::Time => {
                let expected = literal
                    .as_str()
                    .and_then(|s| NaiveTime::parse_from_str(s.trim(), "%H:%M").ok());
                self.temporal_cmp(op, literal, expected, PropertyTime::time_or_midnight)
            }
        }
    }

    fn string(&self, op: Option<Operator>, literal: Option<&str>) -> MatchOutcome {
        let Some(literal) = literal else {
            tracing::warn!(
                line = self.line,
                property = %self.property.name,
                "Filter value is not a string"
            );
            return MatchOutcome::NoRule;
        };
        let Some(op) = op else {
            return MatchOutcome::NotMatched;
        };

        let value = self.property.raw_value.to_lowercase();
        let literal = literal.to_lowercase();
        let hit = match op {
            Operator::SubString => value.contains(&literal),
            Operator::NotSubString => !value.contains(&literal),
            _ => op.holds(value.as_str(), literal.as_str()),
        };
        hit.into()
    }

    fn number(&self, op: Option<Operator>, literal: &Value) -> MatchOutcome {
        let Some(expected) = number(literal) else {
            tracing::warn!(
                line = self.line,
                property = %self.property.name,
                value = %literal,
                "Filter value is not a number"
            );
            return MatchOutcome::NoRule;
        };
        let Some(op) = op else {
            return MatchOutcome::NotMatched;
        };

        let raw = self.property.raw_value.trim();
        match raw.parse::<f64>() {
            Ok(actual) => op.holds(&actual, &expected).into(),
            Err(_e) => {
                let error = ParseError::new(ParseErrorKind::InvalidNumber, 1)
                    .at_line(self.line)
                    .with_context(raw.to_string());
                tracing::warn!(error = %error, property = %self.property.name, "Property value is not a number");
                MatchOutcome::NotMatched
            }
        }
    }

    fn temporal_cmp<T, F>(
        &self,
        op: Option<Operator>,
        literal: &Value,
        expected: Option<T>,
        actual: F,
    ) -> MatchOutcome
    where
        T: PartialOrd,
        F: Fn(&PropertyTime) -> T,
    {
        let Some(expected) = expected else {
            tracing::warn!(
                line = self.line,
                property = %self.property.name,
                value = %literal,
                "Filter value is not a valid date, day or time"
            );
            return MatchOutcome::NoRule;
        };
        let Some(op) = op else {
            return MatchOutcome::NotMatched;
        };

        match self.time {
            Some(Ok(time)) => op.holds(&actual(time), &expected).into(),
            Some(Err(_)) | None => MatchOutcome::NotMatched,
        }
    }
}

/// A string or number literal as text.
fn literal_text(literal: &Value) -> Option<String> {
    match literal {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses `dd.mm.` or `mm/dd` (trailing separator optional) in `year`.
fn date_literal(literal: &Value, year: i32) -> Option<NaiveDate> {
    let s = literal.as_str()?.trim();

    let (day, month) = if let Some((day, month)) = s.trim_end_matches('.').split_once('.') {
        (day, month)
    } else {
        let (month, day) = s.trim_end_matches('/').split_once('/')?;
        (day, month)
    };

    let field = |part: &str| {
        (!part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit()))
            .then(|| part.parse::<u32>().ok())
            .flatten()
    };

    NaiveDate::from_ymd_opt(year, field(month)?, field(day)?)
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
