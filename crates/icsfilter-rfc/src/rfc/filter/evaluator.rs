//! Keep/drop decision for one component.

use super::matcher::PropertyMatcher;
use super::model::ComponentRule;
use super::quorum::Quorum;
use crate::rfc::ical::core::ComponentSpan;
use crate::rfc::ical::parse::{LineStore, top_level_properties};
use crate::rfc::ical::time::TemporalContext;

/// What happens to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
}

/// Applies component rules for one filtering run.
#[derive(Debug, Clone, Copy)]
pub struct ComponentEvaluator<'a> {
    matcher: PropertyMatcher<'a>,
    sum_negative: bool,
}

impl<'a> ComponentEvaluator<'a> {
    #[must_use]
    pub const fn new(temporal: &'a TemporalContext, sum_negative: bool) -> Self {
        Self {
            matcher: PropertyMatcher::new(temporal, sum_negative),
            sum_negative,
        }
    }

    /// ## Summary
    /// Decides whether the component in `span` survives `rule`.
    ///
    /// Every property of the component itself (nested components excluded)
    /// is matched against its property rule. Properties without a rule, or
    /// whose rule had nothing decisive to evaluate, do not take part in the
    /// quorum. Components without a rule are kept.
    #[must_use]
    pub fn evaluate(
        &self,
        store: &LineStore,
        span: &ComponentSpan,
        rule: Option<&ComponentRule>,
    ) -> Verdict {
        let Some(rule) = rule else {
            return Verdict::Keep;
        };

        let properties = top_level_properties(store, span);
        let outcomes = properties
            .iter()
            .map(|(line, property)| {
                self.matcher
                    .evaluate(rule.property_rule(&property.name), property, *line)
            })
            .filter(|outcome| outcome.is_decisive());

        let tally = Quorum::new(rule.required_fraction, self.sum_negative).evaluate(outcomes);
        let verdict = if rule.drops(tally.matched) {
            Verdict::Drop
        } else {
            Verdict::Keep
        };

        tracing::debug!(
            line = span.start,
            component = %span.type_name,
            matched = tally.matched,
            sum = tally.sum,
            checked = tally.checked,
            verdict = ?verdict,
            "Component checked"
        );
        verdict
    }
}
