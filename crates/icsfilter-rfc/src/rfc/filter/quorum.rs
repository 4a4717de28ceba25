//! Fractional-quorum aggregation shared by value and property matching.

/// Outcome of one comparison or one property check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    NotMatched,
    /// Nothing decisive was evaluated: no rule, or no usable literal.
    NoRule,
}

impl MatchOutcome {
    /// Signed weight: +1, -1 or 0.
    #[must_use]
    pub const fn weight(self) -> i32 {
        match self {
            Self::Matched => 1,
            Self::NotMatched => -1,
            Self::NoRule => 0,
        }
    }

    #[must_use]
    pub const fn is_decisive(self) -> bool {
        !matches!(self, Self::NoRule)
    }
}

impl From<bool> for MatchOutcome {
    fn from(hit: bool) -> Self {
        if hit {
            Self::Matched
        } else {
            Self::NotMatched
        }
    }
}

/// Share of checks that must match, between 0 and 1 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Fraction(f64);

impl Fraction {
    /// A single match suffices.
    pub const ANY: Self = Self(0.0);
    /// Every check must match.
    pub const ALL: Self = Self(1.0);

    /// Converts a percentage, rejecting values outside 0-100.
    #[must_use]
    pub fn from_percent(percent: f64) -> Option<Self> {
        (0.0..=100.0)
            .contains(&percent)
            .then(|| Self(percent / 100.0))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    fn is_any(self) -> bool {
        self.0 <= 0.0
    }

    fn is_all(self) -> bool {
        self.0 >= 1.0
    }
}

/// Aggregated result of a quorum evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub sum: i32,
    pub checked: u32,
    /// Whether any outcome was decisive.
    pub decisive: bool,
    pub matched: bool,
}

/// Quorum rule for one level of the filter tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quorum {
    pub required: Fraction,
    /// Whether failed matches subtract from the sum.
    pub sum_negative: bool,
}

impl Quorum {
    #[must_use]
    pub const fn new(required: Fraction, sum_negative: bool) -> Self {
        Self {
            required,
            sum_negative,
        }
    }

    /// ## Summary
    /// Consumes outcomes until the result is settled.
    ///
    /// A match is declared when `sum > 0 && sum >= required * checked`. With
    /// a required fraction of 0 the first match settles it; with 1 the first
    /// outcome that is not a match does. Remaining outcomes are not pulled
    /// from the iterator, so lazy iterators skip their evaluation.
    #[must_use]
    pub fn evaluate<I>(&self, outcomes: I) -> Tally
    where
        I: IntoIterator<Item = MatchOutcome>,
    {
        let mut tally = Tally::default();

        for outcome in outcomes {
            tally.checked += 1;
            tally.decisive |= outcome.is_decisive();
            match outcome {
                MatchOutcome::Matched => tally.sum += 1,
                MatchOutcome::NotMatched if self.sum_negative => tally.sum -= 1,
                MatchOutcome::NotMatched | MatchOutcome::NoRule => {}
            }

            let settled = if outcome == MatchOutcome::Matched {
                self.required.is_any()
            } else {
                self.required.is_all()
            };
            if settled {
                break;
            }
        }

        tally.matched = tally.sum > 0
            && f64::from(tally.sum) >= self.required.value() * f64::from(tally.checked);
        tally
    }
}
