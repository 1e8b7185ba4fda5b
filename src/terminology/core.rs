// Core terminology types: concept identifiers under the fixed `sct:`
// scheme and the concept records the store is built from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheme tag used for terminology references in feature tokens and
/// rule payloads (e.g. `sct:233604007`).
pub const SCT_SCHEME: &str = "sct";

/// Stable identifier for a terminology concept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConceptId(pub i64);

impl ConceptId {
    /// Parse a `sct:<integer id>` reference. Anything that does not
    /// conform (wrong scheme, missing or non-numeric id) is simply not
    /// a terminology reference and yields `None`.
    pub fn parse(s: &str) -> Option<ConceptId> {
        let (scheme, code) = s.split_once(':')?;
        if scheme != SCT_SCHEME || code.is_empty() {
            return None;
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        code.parse().ok().map(ConceptId)
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", SCT_SCHEME, self.0)
    }
}

/// Create a concept id from a bare integer.
pub fn sct(id: i64) -> ConceptId {
    ConceptId(id)
}

/// One concept record: preferred label, searchable synonyms, and
/// direct is-a parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminologyConcept {
    pub id: ConceptId,
    /// Preferred display label.
    pub term: String,
    /// Additional search terms (synonyms, common abbreviations).
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Direct is-a parents within the same subset.
    #[serde(default)]
    pub parents: Vec<ConceptId>,
}

impl TerminologyConcept {
    pub fn new(id: ConceptId, term: &str) -> Self {
        TerminologyConcept {
            id,
            term: term.to_string(),
            synonyms: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn with_synonym(mut self, synonym: &str) -> Self {
        self.synonyms.push(synonym.to_string());
        self
    }

    pub fn with_parent(mut self, parent: ConceptId) -> Self {
        self.parents.push(parent);
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        assert_eq!(ConceptId::parse("sct:233604007"), Some(ConceptId(233604007)));
        assert_eq!(ConceptId::parse("sct:0"), Some(ConceptId(0)));
    }

    #[test]
    fn test_parse_rejects_non_references() {
        assert_eq!(ConceptId::parse(""), None);
        assert_eq!(ConceptId::parse("233604007"), None);
        assert_eq!(ConceptId::parse("sct:"), None);
        assert_eq!(ConceptId::parse("sct:abc"), None);
        assert_eq!(ConceptId::parse("sct:12a"), None);
        assert_eq!(ConceptId::parse("icd:12"), None);
        assert_eq!(ConceptId::parse("SCT:12"), None);
        assert_eq!(ConceptId::parse("sct:-5"), None);
    }

    #[test]
    fn test_display_round_trip() {
        let id = sct(386661006);
        assert_eq!(id.to_string(), "sct:386661006");
        assert_eq!(ConceptId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn test_concept_builder() {
        let concept = TerminologyConcept::new(sct(386661006), "Fever")
            .with_synonym("Pyrexia")
            .with_parent(sct(404684003));
        assert_eq!(concept.synonyms, vec!["Pyrexia"]);
        assert_eq!(concept.parents, vec![sct(404684003)]);
    }
}
