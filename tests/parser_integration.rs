use pediguide::{format_document, load_document, ConditionTest, DocumentError};

#[test]
fn test_load_canonical_ruleset() {
    let source = r#"{
        "schemaVersion": "1",
        "rules": [
            {
                "id": "R1",
                "flag": "Consider sepsis workup",
                "priority": 80,
                "note": "Febrile neonates need a full workup",
                "when": {
                    "all": [{"key": "fever_c", "op": "gte", "valueNumber": 38.0}],
                    "any": [{"key": "age_months", "op": "lte", "valueNumber": 1}]
                }
            },
            {
                "id": "R2",
                "flag": "Possible AOM",
                "priority": 40,
                "when": {
                    "all": [
                        {"key": "sick.pe.ear.red_and_bulging_with_pus", "op": "present"},
                        {"key": "dx", "op": "descendant_of", "value": "sct:40733004"}
                    ],
                    "any": []
                }
            }
        ]
    }"#;

    let doc = load_document(source).expect("canonical ruleset should load");
    assert_eq!(doc.schema_version, "1");
    assert_eq!(doc.rules.len(), 2);
    assert_eq!(doc.rules[0].id, "R1");
    assert_eq!(doc.rules[0].note.as_deref(), Some("Febrile neonates need a full workup"));
    assert_eq!(
        doc.rules[1].when.all[1].test,
        ConditionTest::DescendantOf {
            ancestor: "sct:40733004".to_string()
        }
    );
}

#[test]
fn test_syntax_error_points_at_offending_character() {
    // Trailing comma right before the array closer.
    let err = load_document(r#"{"rules": [1,2,}"#).expect_err("must not parse");
    match err {
        DocumentError::Syntax {
            line,
            column,
            message,
        } => {
            assert_eq!(line, 1);
            assert_eq!(column, 16);
            assert!(!message.is_empty());
        }
        DocumentError::Schema { message } => {
            panic!("expected syntax tier to fire first, got schema error: {message}")
        }
    }
}

#[test]
fn test_syntax_error_location_spans_lines() {
    let source = "{\n  \"schemaVersion\": \"1\",\n  \"rules\": [\n    {\"id\": \"R1\" \"flag\": \"x\"}\n  ]\n}";
    let err = load_document(source).expect_err("must not parse");
    match err {
        DocumentError::Syntax { line, .. } => assert_eq!(line, 4),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_syntax_tier_runs_even_when_schema_would_also_fail() {
    // Both broken JSON and (were it repaired) a wrong shape; the
    // author must see the line/column diagnostic, not a field error.
    let err = load_document(r#"{"rules": "not-an-array",}"#).expect_err("must not parse");
    assert!(matches!(err, DocumentError::Syntax { .. }));
}

#[test]
fn test_schema_error_for_wellformed_wrong_shape() {
    let err = load_document(r#"{"rules": "not-an-array"}"#).expect_err("must not parse");
    match err {
        DocumentError::Schema { message } => assert!(!message.is_empty()),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_format_then_load_is_identity() {
    let source = r#"{
        "schemaVersion": "3",
        "rules": [
            {
                "id": "R7",
                "flag": "Dehydration risk",
                "priority": 55,
                "note": "Check urine output",
                "when": {
                    "all": [
                        {"key": "sick.hpi.urination.decreased", "op": "present"},
                        {"key": "age_months", "op": "between", "minNumber": 0, "maxNumber": 24},
                        {"key": "sex", "op": "one_of", "values": ["F", "M"]}
                    ],
                    "any": [
                        {"key": "sick.hpi.stools.watery", "op": "present"},
                        {"key": "sick.hpi.complaint.vomiting", "op": "present"}
                    ]
                }
            },
            {"id": "R8", "flag": "Unused operator", "when": {"all": [{"key": "k", "op": "matches_regex", "value": "x"}]}}
        ]
    }"#;

    let first = load_document(source).expect("should load");
    let formatted = format_document(&first);
    let second = load_document(&formatted).expect("canonical text should load");

    assert_eq!(first, second);
    // A second format cycle must not churn the text.
    assert_eq!(format_document(&second), formatted);
}

#[test]
fn test_canonical_form_is_stable_across_key_order() {
    let a = r#"{"schemaVersion": "1", "rules": [{"id": "R1", "flag": "f", "priority": 10}]}"#;
    let b = r#"{"rules": [{"priority": 10, "flag": "f", "id": "R1"}], "schemaVersion": "1"}"#;
    let doc_a = load_document(a).expect("should load");
    let doc_b = load_document(b).expect("should load");
    assert_eq!(doc_a, doc_b);
    assert_eq!(format_document(&doc_a), format_document(&doc_b));
}
