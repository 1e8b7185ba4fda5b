//! Guideline matching engine for pediatric clinical encounters.
//!
//! Evaluates clinician-authored JSON rulesets against the normalized
//! feature tokens of one encounter and produces a prioritized list of
//! advisory flags. Concept ancestry (the `descendant_of` operator) is
//! answered by a read-only terminology store built once at startup.

pub mod features;
pub mod guideline;
pub mod registry;
pub mod terminology;

pub use features::{FeatureTokenSet, FeatureValue};
pub use guideline::{
    evaluate, format_document, load_document, Condition, ConditionGroup, ConditionOutcome,
    ConditionTest, DocumentError, GuidelineDocument, GuidelineRule, RuleMatch,
};
pub use registry::{FeatureKeyDescriptor, KeyCategory, FEATURE_KEY_REGISTRY};
pub use terminology::{
    ConceptId, SearchHit, TerminologyConcept, TerminologyError, TerminologyStore,
};
