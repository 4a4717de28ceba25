//! Typed view of the JSON rule document.
//!
//! The document is read leniently: unknown keys are ignored, lists may be a
//! single object, numbers may be JSON numbers or numeric strings, and every
//! misconfigured field is reported and replaced by its default.

use chrono::NaiveTime;
use icsfilter_core::constants::RULES_MIN_LEN;
use serde_json::{Map, Value};

use super::quorum::Fraction;
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::names;

type Object = Map<String, Value>;

/// Keys of the rule document.
pub mod keys {
    pub const CALENDARS: &str = "calendars";
    pub const LABEL: &str = "label";
    pub const ID_PROPERTY: &str = "idProperty";
    pub const ID_VALUE: &str = "idValue";
    pub const REMINDER: &str = "reminder";
    pub const DAY_REMINDER: &str = "dayreminder";
    pub const BOTH_REMINDERS: &str = "bothReminders";
    pub const FILTERS: &str = "filters";

    pub const COMPONENT: &str = "component";
    pub const ACTION: &str = "action";
    pub const PROP_MATCHES: &str = "propMatches";
    pub const PROPERTIES: &str = "properties";

    pub const PROPERTY: &str = "property";
    pub const TYPE: &str = "type";
    pub const VALUE_MATCHES: &str = "valueMatches";
    pub const VALUES: &str = "values";

    pub const CRITERIA: &str = "criteria";
    pub const VALUE: &str = "value";
}

/// The parsed rule document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDocument {
    pub calendars: Vec<CalendarRule>,
}

impl FilterDocument {
    /// ## Summary
    /// Parses rule document text.
    ///
    /// ## Errors
    /// Returns [`RfcError::RulesTooShort`] for text shorter than
    /// `{"calendars":[]}`, [`RfcError::RulesJson`] for invalid JSON and
    /// [`RfcError::RulesNotAnObject`] when the top level is not an object.
    pub fn parse(text: &str) -> RfcResult<Self> {
        let len = text.trim().chars().count();
        if len < RULES_MIN_LEN {
            return Err(RfcError::RulesTooShort {
                len,
                min: RULES_MIN_LEN,
            });
        }

        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// ## Summary
    /// Builds the rule model from an already parsed JSON value.
    ///
    /// ## Errors
    /// Returns [`RfcError::RulesNotAnObject`] when `value` is not an object.
    pub fn from_value(value: &Value) -> RfcResult<Self> {
        let root = value.as_object().ok_or(RfcError::RulesNotAnObject)?;

        let calendars: Vec<CalendarRule> = objects(root.get(keys::CALENDARS), keys::CALENDARS)
            .into_iter()
            .map(CalendarRule::from_object)
            .collect();

        tracing::debug!(calendars = calendars.len(), "Read filter rules");
        Ok(Self { calendars })
    }
}

/// Clock time of the reminder for date-only components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayReminder {
    pub time: NaiveTime,
    /// Remind on the day before the component's date.
    pub previous_day: bool,
}

impl DayReminder {
    /// Parses `h:mm`, where a leading `-` selects the previous day.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (previous_day, clock) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, text),
        };
        NaiveTime::parse_from_str(clock, "%H:%M")
            .ok()
            .map(|time| Self { time, previous_day })
    }
}

/// Rules for one calendar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarRule {
    pub label: Option<String>,
    pub id_property: Option<String>,
    pub id_value: Option<String>,
    pub reminder_minutes: Option<i64>,
    pub day_reminder: Option<DayReminder>,
    /// `None` leaves the choice to the engine default.
    pub both_reminders: Option<bool>,
    pub components: Vec<ComponentRule>,
}

impl CalendarRule {
    fn from_object(obj: &Object) -> Self {
        let reminder_minutes = obj.get(keys::REMINDER).and_then(|value| {
            let minutes = integer(value);
            if minutes.is_none() {
                tracing::warn!(value = %value, "Converting reminder duration failed, no reminder for timed components");
            }
            minutes
        });

        let day_reminder = obj.get(keys::DAY_REMINDER).and_then(|value| {
            let reminder = value.as_str().and_then(DayReminder::parse);
            if reminder.is_none() {
                tracing::warn!(value = %value, "Converting dayreminder time failed, no reminder for full day components");
            }
            reminder
        });

        let both_reminders = obj.get(keys::BOTH_REMINDERS).and_then(|value| {
            let both = flag(value);
            if both.is_none() {
                tracing::warn!(value = %value, "bothReminders is not a yes/no value, using default");
            }
            both
        });

        let mut components: Vec<ComponentRule> = Vec::new();
        for rule in objects(obj.get(keys::FILTERS), keys::FILTERS)
            .into_iter()
            .filter_map(ComponentRule::from_object)
        {
            if components.iter().any(|c| c.applies_to(&rule.type_name)) {
                tracing::debug!(component = %rule.type_name, "Duplicate component rule ignored");
            } else {
                components.push(rule);
            }
        }

        Self {
            label: text(obj, keys::LABEL),
            id_property: text(obj, keys::ID_PROPERTY),
            id_value: text(obj, keys::ID_VALUE),
            reminder_minutes,
            day_reminder,
            both_reminders,
            components,
        }
    }

    /// Returns whether the rule's label equals `label` (case-insensitive).
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == label.to_lowercase())
    }

    /// The identifying `(property name, value)` pair, if the rule has an
    /// `idValue`. The property defaults to `X-WR-CALNAME`.
    #[must_use]
    pub fn identity(&self) -> Option<(&str, &str)> {
        let value = self.id_value.as_deref()?;
        let property = self.id_property.as_deref().unwrap_or(names::X_WR_CALNAME);
        Some((property, value))
    }

    /// The rule for components of `type_name`, if any.
    #[must_use]
    pub fn component_rule(&self, type_name: &str) -> Option<&ComponentRule> {
        self.components.iter().find(|c| c.applies_to(type_name))
    }
}

/// Whether matching components are kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Keep matching components, drop the rest.
    Accept,
    /// Drop matching components.
    #[default]
    Reject,
}

impl Action {
    fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        match value.as_str().map(str::to_ascii_lowercase).as_deref() {
            Some("accept") => Self::Accept,
            Some("reject") => Self::Reject,
            _ => {
                tracing::warn!(value = %value, "Unknown action, using reject");
                Self::default()
            }
        }
    }
}

/// Rule for one component type.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRule {
    pub type_name: String,
    pub action: Action,
    pub required_fraction: Fraction,
    pub properties: Vec<PropertyRule>,
}

impl ComponentRule {
    fn from_object(obj: &Object) -> Option<Self> {
        let Some(type_name) = text(obj, keys::COMPONENT) else {
            let rule = Value::Object(obj.clone());
            tracing::warn!(rule = %rule, "Component rule without component name ignored");
            return None;
        };

        let mut properties: Vec<PropertyRule> = Vec::new();
        for rule in objects(obj.get(keys::PROPERTIES), keys::PROPERTIES)
            .into_iter()
            .filter_map(PropertyRule::from_object)
        {
            if properties.iter().any(|p| p.applies_to(&rule.property_name)) {
                tracing::debug!(
                    component = %type_name,
                    property = %rule.property_name,
                    "Duplicate property rule ignored"
                );
            } else {
                properties.push(rule);
            }
        }

        Some(Self {
            action: Action::from_value(obj.get(keys::ACTION)),
            required_fraction: fraction(obj, keys::PROP_MATCHES),
            type_name,
            properties,
        })
    }

    #[must_use]
    pub fn applies_to(&self, type_name: &str) -> bool {
        self.type_name.eq_ignore_ascii_case(type_name)
    }

    /// The rule for properties named `name`, if any.
    #[must_use]
    pub fn property_rule(&self, name: &str) -> Option<&PropertyRule> {
        self.properties.iter().find(|p| p.applies_to(name))
    }

    /// Whether a component with this match result is dropped.
    #[must_use]
    pub const fn drops(&self, matched: bool) -> bool {
        match self.action {
            Action::Reject => matched,
            Action::Accept => !matched,
        }
    }
}

/// How a property value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    String,
    Number,
    Date,
    /// Day of the week, Monday = 1.
    Day,
    /// Local time of day.
    Time,
}

impl ValueType {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            "day" => Some(Self::Day),
            "time" => Some(Self::Time),
            _ => None,
        }
    }
}

/// Rule for one property name.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
    pub property_name: String,
    pub value_type: ValueType,
    pub required_fraction: Fraction,
    pub values: Vec<ValueCriterion>,
}

impl PropertyRule {
    fn from_object(obj: &Object) -> Option<Self> {
        let Some(property_name) = text(obj, keys::PROPERTY) else {
            let rule = Value::Object(obj.clone());
            tracing::warn!(rule = %rule, "Property rule without property name ignored");
            return None;
        };

        let value_type = match obj.get(keys::TYPE) {
            None => ValueType::default(),
            Some(value) => value.as_str().and_then(ValueType::parse).unwrap_or_else(|| {
                tracing::warn!(property = %property_name, value = %value, "Unknown value type, using string");
                ValueType::default()
            }),
        };

        let values = objects(obj.get(keys::VALUES), keys::VALUES)
            .into_iter()
            .map(|criterion| ValueCriterion::from_object(criterion, &property_name, value_type))
            .collect();

        Some(Self {
            required_fraction: fraction(obj, keys::VALUE_MATCHES),
            property_name,
            value_type,
            values,
        })
    }

    #[must_use]
    pub fn applies_to(&self, name: &str) -> bool {
        self.property_name.eq_ignore_ascii_case(name)
    }
}

/// Comparison between a property value and a rule literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Larger,
    Smaller,
    EqualOrLarger,
    EqualOrSmaller,
    SubString,
    NotSubString,
}

impl Operator {
    /// Parses a `criteria` string: `=`, `!=`, `<>`, `<`, `>`, `<=`, `>=`, `s`, `!s`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" => Some(Self::Equal),
            "!=" | "<>" => Some(Self::NotEqual),
            ">" => Some(Self::Larger),
            "<" => Some(Self::Smaller),
            ">=" => Some(Self::EqualOrLarger),
            "<=" => Some(Self::EqualOrSmaller),
            "s" => Some(Self::SubString),
            "!s" => Some(Self::NotSubString),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::Larger | Self::Smaller | Self::EqualOrLarger | Self::EqualOrSmaller
        )
    }

    #[must_use]
    pub const fn is_substring(self) -> bool {
        matches!(self, Self::SubString | Self::NotSubString)
    }

    /// Applies an equality or ordering operator to `lhs <op> rhs`.
    ///
    /// Substring operators never hold here.
    #[must_use]
    pub fn holds<T: PartialOrd + ?Sized>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::Larger => lhs > rhs,
            Self::Smaller => lhs < rhs,
            Self::EqualOrLarger => lhs >= rhs,
            Self::EqualOrSmaller => lhs <= rhs,
            Self::SubString | Self::NotSubString => false,
        }
    }
}

/// One `{ "criteria": .., "value": .. }` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCriterion {
    /// `None` for a missing or unknown criteria string; such a criterion
    /// never matches.
    pub operator: Option<Operator>,
    pub literal: Value,
}

impl ValueCriterion {
    fn from_object(obj: &Object, property: &str, value_type: ValueType) -> Self {
        let criteria = obj.get(keys::CRITERIA);
        let operator = criteria.and_then(Value::as_str).and_then(Operator::parse);

        match operator {
            None => {
                tracing::warn!(property = %property, criteria = ?criteria, "Unknown criteria");
            }
            Some(op) if op.is_ordering() && value_type == ValueType::String => {
                tracing::warn!(property = %property, operator = ?op, "Ordering criteria not defined for strings");
            }
            Some(op) if op.is_substring() && value_type != ValueType::String => {
                tracing::warn!(property = %property, operator = ?op, "Substring criteria defined for strings only");
            }
            Some(_) => {}
        }

        Self {
            operator,
            literal: obj.get(keys::VALUE).cloned().unwrap_or(Value::Null),
        }
    }
}

/// Objects of a list field that may also be a single object.
fn objects<'a>(value: Option<&'a Value>, key: &str) -> Vec<&'a Object> {
    match value {
        None => Vec::new(),
        Some(Value::Object(obj)) => vec![obj],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let obj = item.as_object();
                if obj.is_none() {
                    tracing::warn!(key, item = %item, "List item is not an object, ignored");
                }
                obj
            })
            .collect(),
        Some(other) => {
            tracing::warn!(key, value = %other, "Expected a list of objects");
            Vec::new()
        }
    }
}

fn text(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// A JSON number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A JSON number or a numeric string, with any fraction truncated toward zero.
pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse().ok().and_then(truncate))
        }
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked and the fraction is dropped on purpose"
)]
fn truncate(value: f64) -> Option<i64> {
    let whole = value.trunc();
    (whole.is_finite() && whole.abs() < 1e15).then_some(whole as i64)
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Some(true),
            "no" | "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A percentage field as a fraction; missing, non-numeric and out-of-range
/// values give 0.
fn fraction(obj: &Object, key: &str) -> Fraction {
    let Some(value) = obj.get(key) else {
        return Fraction::default();
    };
    let Some(percent) = number(value) else {
        tracing::warn!(key, value = %value, "Not a number, using 0 %");
        return Fraction::default();
    };
    Fraction::from_percent(percent).unwrap_or_else(|| {
        tracing::warn!(key, percent, "Amount of matches is not between 0 - 100 %, using 0 %");
        Fraction::default()
    })
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
