//! Rule-driven calendar filtering.
//!
//! - Model: typed rule document
//! - Quorum: fractional match aggregation
//! - Resolver: rule selection per calendar
//! - Matcher: property rules against property values
//! - Evaluator: keep/drop decision per component
//! - Engine: the filtering run

mod engine;
mod evaluator;
mod matcher;
pub mod model;
mod quorum;
mod resolver;

pub use engine::{EngineOptions, IcsFilter, filter_ics};
pub use evaluator::{ComponentEvaluator, Verdict};
pub use matcher::PropertyMatcher;
pub use model::{
    Action, CalendarRule, ComponentRule, DayReminder, FilterDocument, Operator, PropertyRule,
    ValueCriterion, ValueType,
};
pub use quorum::{Fraction, MatchOutcome, Quorum, Tally};
pub use resolver::resolve_calendar;
