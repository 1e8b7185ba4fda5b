// Match aggregation: run every rule against one encounter's tokens
// and rank whatever fires.
//
// Output order is fully deterministic: matches are collected in
// document order, then stably sorted by priority descending with
// case-insensitive flag text as the tiebreak, so identical inputs
// always produce the identical sequence regardless of any map
// iteration order inside the engine.

use crate::features::FeatureTokenSet;
use crate::terminology::TerminologyStore;

use super::eval::evaluate_condition;
use super::model::{ConditionGroup, GuidelineDocument, GuidelineRule, RuleMatch};

/// Evaluate a whole document against one token set and return the
/// ranked advisory matches. Bad rule content never raises; a
/// condition the evaluator cannot use simply keeps its rule from
/// firing.
pub fn evaluate(
    tokens: &FeatureTokenSet,
    document: &GuidelineDocument,
    store: &TerminologyStore,
) -> Vec<RuleMatch> {
    let mut matches: Vec<RuleMatch> = Vec::new();
    for rule in &document.rules {
        if rule_fires(rule, tokens, store) {
            tracing::debug!(rule_id = %rule.id, priority = rule.priority, "guideline rule fired");
            matches.push(RuleMatch {
                rule_id: rule.id.clone(),
                flag_text: rule.flag.clone(),
                note: rule.note.clone(),
                priority: rule.priority,
            });
        }
    }

    matches.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.flag_text.to_lowercase().cmp(&b.flag_text.to_lowercase()))
    });
    matches
}

fn rule_fires(rule: &GuidelineRule, tokens: &FeatureTokenSet, store: &TerminologyStore) -> bool {
    group_holds(&rule.when, tokens, store)
}

/// `all` is a strict AND, `any` is an OR; each holds vacuously when
/// empty, and the rule needs both.
fn group_holds(group: &ConditionGroup, tokens: &FeatureTokenSet, store: &TerminologyStore) -> bool {
    let all_hold = group
        .all
        .iter()
        .all(|c| evaluate_condition(c, tokens, store).holds());
    let any_holds = group.any.is_empty()
        || group
            .any
            .iter()
            .any(|c| evaluate_condition(c, tokens, store).holds());
    all_hold && any_holds
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue;
    use crate::guideline::model::{Condition, ConditionTest};

    fn store() -> TerminologyStore {
        TerminologyStore::load(Vec::new()).unwrap()
    }

    fn rule(id: &str, flag: &str, priority: u8, when: ConditionGroup) -> GuidelineRule {
        GuidelineRule {
            id: id.to_string(),
            flag: flag.to_string(),
            priority,
            note: None,
            when,
        }
    }

    fn gte(key: &str, threshold: f64) -> Condition {
        Condition {
            key: key.to_string(),
            test: ConditionTest::Gte { threshold },
        }
    }

    fn present(key: &str) -> Condition {
        Condition {
            key: key.to_string(),
            test: ConditionTest::Present,
        }
    }

    fn fever_tokens() -> FeatureTokenSet {
        let mut tokens = FeatureTokenSet::new();
        tokens.insert("fever_c", FeatureValue::Number(39.0));
        tokens.insert("sick.hpi.complaint.cough", FeatureValue::Present);
        tokens
    }

    #[test]
    fn test_vacuous_rule_always_fires() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![rule("R1", "Always", 10, ConditionGroup::default())],
        };
        let matches = evaluate(&FeatureTokenSet::new(), &document, &store());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rule_id, "R1");
    }

    #[test]
    fn test_all_is_strict_and() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![rule(
                "R1",
                "Febrile with cough",
                10,
                ConditionGroup {
                    all: vec![gte("fever_c", 38.0), present("sick.hpi.complaint.cough")],
                    any: Vec::new(),
                },
            )],
        };
        assert_eq!(evaluate(&fever_tokens(), &document, &store()).len(), 1);

        let mut afebrile = fever_tokens();
        afebrile.insert("fever_c", FeatureValue::Number(37.0));
        assert!(evaluate(&afebrile, &document, &store()).is_empty());
    }

    #[test]
    fn test_any_is_or_gate_on_top_of_all() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![rule(
                "R1",
                "Febrile and either symptom",
                10,
                ConditionGroup {
                    all: vec![gte("fever_c", 38.0)],
                    any: vec![
                        present("sick.hpi.complaint.cough"),
                        present("sick.hpi.complaint.ear_pain"),
                    ],
                },
            )],
        };
        // Cough satisfies the any-gate.
        assert_eq!(evaluate(&fever_tokens(), &document, &store()).len(), 1);

        // Fever alone does not.
        let mut just_fever = FeatureTokenSet::new();
        just_fever.insert("fever_c", FeatureValue::Number(39.0));
        assert!(evaluate(&just_fever, &document, &store()).is_empty());
    }

    #[test]
    fn test_ranking_priority_then_flag() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![
                rule("R1", "zebra flag", 50, ConditionGroup::default()),
                rule("R2", "Apple flag", 50, ConditionGroup::default()),
                rule("R3", "urgent flag", 90, ConditionGroup::default()),
                rule("R4", "apple flag", 50, ConditionGroup::default()),
            ],
        };
        let matches = evaluate(&FeatureTokenSet::new(), &document, &store());
        let ids: Vec<&str> = matches.iter().map(|m| m.rule_id.as_str()).collect();
        // Priority first; within priority 50 the flags sort
        // case-insensitively, and the two "apple" spellings keep
        // document order (stable sort).
        assert_eq!(ids, vec!["R3", "R2", "R4", "R1"]);
    }

    #[test]
    fn test_matches_are_deterministic() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![
                rule("R1", "One", 10, ConditionGroup::default()),
                rule("R2", "Two", 20, ConditionGroup::default()),
            ],
        };
        let tokens = fever_tokens();
        let first = evaluate(&tokens, &document, &store());
        for _ in 0..10 {
            assert_eq!(evaluate(&tokens, &document, &store()), first);
        }
    }

    #[test]
    fn test_duplicate_rule_ids_fire_independently() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![
                rule("R1", "First spelling", 10, ConditionGroup::default()),
                rule("R1", "Second spelling", 20, ConditionGroup::default()),
            ],
        };
        let matches = evaluate(&FeatureTokenSet::new(), &document, &store());
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.rule_id == "R1"));
    }

    #[test]
    fn test_malformed_condition_only_silences_its_rule() {
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![
                rule(
                    "R1",
                    "Broken",
                    90,
                    ConditionGroup {
                        all: vec![Condition {
                            key: String::new(),
                            test: ConditionTest::Present,
                        }],
                        any: Vec::new(),
                    },
                ),
                rule("R2", "Healthy", 10, ConditionGroup::default()),
            ],
        };
        let matches = evaluate(&FeatureTokenSet::new(), &document, &store());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rule_id, "R2");
    }

    #[test]
    fn test_note_carried_through() {
        let mut with_note = rule("R1", "Flag", 10, ConditionGroup::default());
        with_note.note = Some("Rationale".to_string());
        let document = GuidelineDocument {
            schema_version: "1".to_string(),
            rules: vec![with_note],
        };
        let matches = evaluate(&FeatureTokenSet::new(), &document, &store());
        assert_eq!(matches[0].note.as_deref(), Some("Rationale"));
    }
}
