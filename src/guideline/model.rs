// Guideline document model: the parsed, typed representation of a
// clinician-authored ruleset.
//
// Conditions are a tagged union keyed by operator, so each operator
// carries exactly the payload it needs and an impossible combination
// (a range on `present`, a value list on `gte`) is unrepresentable.
// Authoring mistakes that cannot be typed this way are absorbed into
// the `Never` variant, which evaluates to a non-match instead of
// failing the document.

use serde::{Deserialize, Serialize};

/// Highest admissible rule priority; decoded values are clamped into
/// `0..=PRIORITY_MAX`.
pub const PRIORITY_MAX: u8 = 100;

/// A parsed ruleset. Replaced wholesale on each successful save; the
/// engine never patches a document in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidelineDocument {
    /// Advisory schema tag carried through round-trips; the engine
    /// does not branch on it.
    pub schema_version: String,
    pub rules: Vec<GuidelineRule>,
}

/// One clinician-authored conditional statement. Rule ids are not
/// validated for uniqueness; duplicate ids evaluate and fire
/// independently.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidelineRule {
    pub id: String,
    /// Human-readable alert text shown when the rule fires.
    pub flag: String,
    /// Ranking weight, `0..=100`, higher fires first.
    pub priority: u8,
    /// Free-text rationale shown on demand.
    pub note: Option<String>,
    pub when: ConditionGroup,
}

/// AND/OR gates composing a rule's trigger: every member of `all`
/// must hold and at least one member of `any` must hold. Either list
/// holds vacuously when empty, so a rule with two empty groups always
/// fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroup {
    pub all: Vec<Condition>,
    pub any: Vec<Condition>,
}

impl ConditionGroup {
    pub fn is_vacuous(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }
}

/// One condition: a feature-token key plus the test applied to it.
/// An empty key marks a malformed condition that never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub key: String,
    pub test: ConditionTest,
}

/// The closed operator set, each variant carrying exactly its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTest {
    /// Key exists with a non-absent value.
    Present,
    /// Key missing or explicitly absent.
    Absent,
    /// Token's string value equals `value` (case-sensitive).
    Equals { value: String },
    /// Token is present and its string value differs from `value`.
    /// Absence is not proof of inequality.
    NotEquals { value: String },
    /// Token's numeric value is at least `threshold`.
    Gte { threshold: f64 },
    /// Token's numeric value is at most `threshold`.
    Lte { threshold: f64 },
    /// Inclusive numeric range; an absent bound is unconstrained.
    Between { min: Option<f64>, max: Option<f64> },
    /// Token's string value is a member of `values` (case-sensitive).
    OneOf { values: Vec<String> },
    /// Token's value, read as a `sct:` reference, is a strict
    /// descendant of `ancestor`.
    DescendantOf { ancestor: String },
    /// Unknown operator or payload that does not fit its operator;
    /// never matches. The raw operator name is kept so the condition
    /// survives a format round-trip.
    Never { op: String },
}

impl ConditionTest {
    /// Wire name of the operator this test was authored with.
    pub fn op_name(&self) -> &str {
        match self {
            ConditionTest::Present => "present",
            ConditionTest::Absent => "absent",
            ConditionTest::Equals { .. } => "equals",
            ConditionTest::NotEquals { .. } => "not_equals",
            ConditionTest::Gte { .. } => "gte",
            ConditionTest::Lte { .. } => "lte",
            ConditionTest::Between { .. } => "between",
            ConditionTest::OneOf { .. } => "one_of",
            ConditionTest::DescendantOf { .. } => "descendant_of",
            ConditionTest::Never { op } => op,
        }
    }
}

/// Output record for one firing rule. Produced fresh on every
/// evaluation pass and never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_id: String,
    pub flag_text: String,
    pub note: Option<String>,
    pub priority: u8,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_is_vacuous() {
        let group = ConditionGroup::default();
        assert!(group.is_vacuous());

        let group = ConditionGroup {
            all: vec![Condition {
                key: "fever_c".to_string(),
                test: ConditionTest::Present,
            }],
            any: Vec::new(),
        };
        assert!(!group.is_vacuous());
    }

    #[test]
    fn test_op_names() {
        assert_eq!(ConditionTest::Present.op_name(), "present");
        assert_eq!(
            ConditionTest::Between {
                min: Some(3.0),
                max: None
            }
            .op_name(),
            "between"
        );
        assert_eq!(
            ConditionTest::Never {
                op: "regex".to_string()
            }
            .op_name(),
            "regex"
        );
    }
}
