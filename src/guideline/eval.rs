// Condition evaluator: one condition against one token set, with a
// three-valued outcome.
//
// `Indeterminate` marks "the key the operator needed to compare
// against was never observed." Every caller in the engine collapses
// it to a non-match (ambiguous data must never raise an advisory
// flag), but the distinction is kept so tests can pin the
// missing-data behavior of each operator and a UI can hint at absent
// observations.

use crate::features::{FeatureTokenSet, FeatureValue};
use crate::terminology::{ConceptId, TerminologyStore};

use super::model::{Condition, ConditionTest};

/// Three-valued result of evaluating a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Match,
    NoMatch,
    /// The token the operator needed was missing or recorded absent.
    Indeterminate,
}

impl ConditionOutcome {
    /// Collapse to the boolean the aggregator gates on: only a real
    /// match holds.
    pub fn holds(self) -> bool {
        matches!(self, ConditionOutcome::Match)
    }
}

/// Evaluate one condition. Malformed conditions (empty key, unusable
/// payload, unparseable terminology reference) are a non-match, never
/// an error.
pub fn evaluate_condition(
    condition: &Condition,
    tokens: &FeatureTokenSet,
    store: &TerminologyStore,
) -> ConditionOutcome {
    use ConditionOutcome::{Indeterminate, Match, NoMatch};

    if condition.key.is_empty() {
        return NoMatch;
    }
    let value = tokens.get(&condition.key);

    match &condition.test {
        ConditionTest::Present => match value {
            None | Some(FeatureValue::Absent) => NoMatch,
            Some(_) => Match,
        },

        ConditionTest::Absent => match value {
            None | Some(FeatureValue::Absent) => Match,
            Some(_) => NoMatch,
        },

        ConditionTest::Equals { value: expected } => match value {
            None | Some(FeatureValue::Absent) => Indeterminate,
            Some(actual) => match actual.as_text() {
                Some(text) if text == expected => Match,
                _ => NoMatch,
            },
        },

        // Absence is not proof of inequality: the token must be
        // present with a differing string value.
        ConditionTest::NotEquals { value: expected } => match value {
            None | Some(FeatureValue::Absent) => Indeterminate,
            Some(actual) => match actual.as_text() {
                Some(text) if text != expected => Match,
                _ => NoMatch,
            },
        },

        ConditionTest::Gte { threshold } => numeric_test(value, |n| n >= *threshold),

        ConditionTest::Lte { threshold } => numeric_test(value, |n| n <= *threshold),

        ConditionTest::Between { min, max } => numeric_test(value, |n| {
            min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
        }),

        ConditionTest::OneOf { values } => match value {
            None | Some(FeatureValue::Absent) => Indeterminate,
            Some(actual) => match actual.as_text() {
                Some(text) if values.iter().any(|v| v == text) => Match,
                _ => NoMatch,
            },
        },

        ConditionTest::DescendantOf { ancestor } => {
            let Some(ancestor_id) = ConceptId::parse(ancestor) else {
                return NoMatch;
            };
            match value {
                None | Some(FeatureValue::Absent) => Indeterminate,
                Some(actual) => match actual.as_text().and_then(ConceptId::parse) {
                    Some(candidate) if store.is_descendant_of(candidate, ancestor_id) => Match,
                    _ => NoMatch,
                },
            }
        }

        ConditionTest::Never { .. } => NoMatch,
    }
}

/// Shared numeric arm: missing token is indeterminate, a present but
/// non-numeric token is a plain non-match.
fn numeric_test(
    value: Option<&FeatureValue>,
    predicate: impl Fn(f64) -> bool,
) -> ConditionOutcome {
    match value {
        None | Some(FeatureValue::Absent) => ConditionOutcome::Indeterminate,
        Some(actual) => match actual.as_number() {
            Some(n) if predicate(n) => ConditionOutcome::Match,
            Some(_) => ConditionOutcome::NoMatch,
            None => ConditionOutcome::NoMatch,
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
