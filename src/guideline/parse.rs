// Rule parser / validator: raw JSON text to `GuidelineDocument` and
// back.
//
// Two independent failure tiers, both recoverable and user-facing:
// the syntax tier always runs first so a malformed document yields a
// precise line/column even when schema decoding would also fail, and
// the schema tier reports field-level decode problems. Evaluation-time
// authoring mistakes (unknown operator, payload that does not fit its
// operator) are not errors at all; they compile to conditions that
// never match.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{
    Condition, ConditionGroup, ConditionTest, GuidelineDocument, GuidelineRule, PRIORITY_MAX,
};
use super::syntax;

/// Load/save failure taxonomy. Callers surface `Syntax` as "your JSON
/// is broken, here is where" and `Schema` as "your JSON is valid but
/// not a guideline document."
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("schema error: {message}")]
    Schema { message: String },
}

// =============================================================================
// Wire model
// =============================================================================

// The raw serde shapes mirror the authored JSON exactly: camelCase
// names, every condition payload optional. Unknown fields are ignored
// for forward compatibility; the condition groups default to empty.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawDocument {
    #[serde(rename = "schemaVersion", default)]
    schema_version: String,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRule {
    id: String,
    flag: String,
    #[serde(default)]
    priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(default)]
    when: RawConditionGroup,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawConditionGroup {
    #[serde(default)]
    all: Vec<RawCondition>,
    #[serde(default)]
    any: Vec<RawCondition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawCondition {
    #[serde(default)]
    key: String,
    #[serde(default)]
    op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(rename = "valueNumber", default, skip_serializing_if = "Option::is_none")]
    value_number: Option<f64>,
    #[serde(rename = "minNumber", default, skip_serializing_if = "Option::is_none")]
    min_number: Option<f64>,
    #[serde(rename = "maxNumber", default, skip_serializing_if = "Option::is_none")]
    max_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,
}

// =============================================================================
// Loading
// =============================================================================

/// Parse raw JSON text into a document, syntax tier first.
pub fn load_document(text: &str) -> Result<GuidelineDocument, DocumentError> {
    if let Err(violation) = syntax::check(text) {
        let (line, column) = syntax::line_col(text, violation.offset);
        return Err(DocumentError::Syntax {
            line,
            column,
            message: violation.message,
        });
    }

    let raw: RawDocument = serde_json::from_str(text).map_err(|e| DocumentError::Schema {
        message: e.to_string(),
    })?;

    Ok(compile_document(raw))
}

fn compile_document(raw: RawDocument) -> GuidelineDocument {
    GuidelineDocument {
        schema_version: raw.schema_version,
        rules: raw.rules.into_iter().map(compile_rule).collect(),
    }
}

fn compile_rule(raw: RawRule) -> GuidelineRule {
    GuidelineRule {
        id: raw.id,
        flag: raw.flag,
        priority: raw.priority.clamp(0, PRIORITY_MAX as i64) as u8,
        note: raw.note,
        when: ConditionGroup {
            all: raw.when.all.into_iter().map(compile_condition).collect(),
            any: raw.when.any.into_iter().map(compile_condition).collect(),
        },
    }
}

fn compile_condition(raw: RawCondition) -> Condition {
    let never = |op: &str| ConditionTest::Never { op: op.to_string() };
    let test = match raw.op.as_str() {
        "present" => ConditionTest::Present,
        "absent" => ConditionTest::Absent,
        "equals" => match raw.value {
            Some(value) => ConditionTest::Equals { value },
            None => never("equals"),
        },
        "not_equals" => match raw.value {
            Some(value) => ConditionTest::NotEquals { value },
            None => never("not_equals"),
        },
        "gte" => match raw.value_number {
            Some(threshold) => ConditionTest::Gte { threshold },
            None => never("gte"),
        },
        "lte" => match raw.value_number {
            Some(threshold) => ConditionTest::Lte { threshold },
            None => never("lte"),
        },
        "between" => ConditionTest::Between {
            min: raw.min_number,
            max: raw.max_number,
        },
        "one_of" => match raw.values {
            Some(values) => ConditionTest::OneOf { values },
            None => never("one_of"),
        },
        "descendant_of" => match raw.value {
            Some(ancestor) => ConditionTest::DescendantOf { ancestor },
            None => never("descendant_of"),
        },
        other => never(other),
    };
    Condition { key: raw.key, test }
}

// =============================================================================
// Formatting
// =============================================================================

/// Canonical serialization: alphabetical keys, two-space indentation.
/// Loading, formatting, and loading again yields an identical
/// document, so repeated save cycles never churn the stored text.
pub fn format_document(doc: &GuidelineDocument) -> String {
    let raw = raw_document(doc);
    // Going through Value sorts object keys (its map is a BTreeMap);
    // plain struct types cannot fail to become a Value.
    let value = serde_json::to_value(raw).expect("wire model serializes to a JSON value");
    serde_json::to_string_pretty(&value).expect("JSON value serializes to text")
}

fn raw_document(doc: &GuidelineDocument) -> RawDocument {
    RawDocument {
        schema_version: doc.schema_version.clone(),
        rules: doc.rules.iter().map(raw_rule).collect(),
    }
}

fn raw_rule(rule: &GuidelineRule) -> RawRule {
    RawRule {
        id: rule.id.clone(),
        flag: rule.flag.clone(),
        priority: rule.priority as i64,
        note: rule.note.clone(),
        when: RawConditionGroup {
            all: rule.when.all.iter().map(raw_condition).collect(),
            any: rule.when.any.iter().map(raw_condition).collect(),
        },
    }
}

fn raw_condition(condition: &Condition) -> RawCondition {
    let mut raw = RawCondition {
        key: condition.key.clone(),
        op: condition.test.op_name().to_string(),
        ..RawCondition::default()
    };
    match &condition.test {
        ConditionTest::Present | ConditionTest::Absent | ConditionTest::Never { .. } => {}
        ConditionTest::Equals { value } | ConditionTest::NotEquals { value } => {
            raw.value = Some(value.clone());
        }
        ConditionTest::Gte { threshold } | ConditionTest::Lte { threshold } => {
            raw.value_number = Some(*threshold);
        }
        ConditionTest::Between { min, max } => {
            raw.min_number = *min;
            raw.max_number = *max;
        }
        ConditionTest::OneOf { values } => {
            raw.values = Some(values.clone());
        }
        ConditionTest::DescendantOf { ancestor } => {
            raw.value = Some(ancestor.clone());
        }
    }
    raw
}

// =============================================================================
// Tests
// =============================================================================
