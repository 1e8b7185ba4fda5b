// Guideline matching engine.
//
// Pipeline: raw JSON text -> parse (syntax tier, then schema tier) ->
// `GuidelineDocument` -> per-encounter evaluation against a
// `FeatureTokenSet`, consulting the terminology store for ancestry ->
// ranked `RuleMatch` list.
//
// ## Architecture
//
// - `model.rs`: document/rule/condition types; conditions are a
//   tagged union keyed by operator.
// - `syntax.rs`: byte-position-aware JSON well-formedness check.
// - `parse.rs`: two-tier load, canonical formatting.
// - `eval.rs`: tri-state evaluation of a single condition.
// - `matcher.rs`: document sweep and deterministic ranking.
//
// Everything here is a pure function over immutable inputs; the
// engine holds no state between evaluation calls.

pub mod eval;
pub mod matcher;
pub mod model;
pub mod parse;
pub mod syntax;

pub use eval::{evaluate_condition, ConditionOutcome};
pub use matcher::evaluate;
pub use model::{
    Condition, ConditionGroup, ConditionTest, GuidelineDocument, GuidelineRule, RuleMatch,
    PRIORITY_MAX,
};
pub use parse::{format_document, load_document, DocumentError};
pub use syntax::{line_col, SyntaxViolation};
