// Terminology infrastructure: concept codes, ancestry, and search.
//
// The store answers the two questions the engine needs:
//
// 1. **Subsumption** (`is_descendant_of`): backs the rule operator
//    that tests whether an encounter's coded finding is a
//    specialization of a guideline concept.
// 2. **Search** (`search`): powers the authoring UI's concept picker
//    over preferred labels and synonyms.
//
// ## Architecture
//
// - `core.rs`: `ConceptId` (`sct:` scheme parsing/printing) and
//   `TerminologyConcept` records.
// - `store.rs`: `TerminologyStore`: fail-fast load, materialized
//   transitive-ancestor index, ranked search.
//
// The concept table itself is produced offline from a SNOMED CT
// subset build; `builtin_concepts` ships a small pediatric slice for
// tests and demos.

pub mod core;
pub mod store;

pub use self::core::{sct, ConceptId, TerminologyConcept, SCT_SCHEME};
pub use self::store::{SearchHit, TerminologyError, TerminologyStore};

// =============================================================================
// Compiled-in pediatric subset
// =============================================================================

/// A small curated concept slice mirroring the shape of the full
/// subset build: one is-a tree of common pediatric findings, with
/// synonyms carried as search aids.
pub fn builtin_concepts() -> Vec<TerminologyConcept> {
    vec![
        TerminologyConcept::new(sct(404684003), "Clinical finding"),
        TerminologyConcept::new(sct(64572001), "Disease")
            .with_synonym("Disorder")
            .with_parent(sct(404684003)),
        TerminologyConcept::new(sct(40733004), "Infectious disease")
            .with_synonym("Infection")
            .with_parent(sct(64572001)),
        TerminologyConcept::new(sct(50043002), "Disorder of respiratory system")
            .with_synonym("Respiratory disorder")
            .with_parent(sct(64572001)),
        TerminologyConcept::new(sct(68566005), "Urinary tract infection")
            .with_synonym("UTI")
            .with_parent(sct(40733004)),
        TerminologyConcept::new(sct(65363002), "Otitis media")
            .with_synonym("Middle ear infection")
            .with_synonym("OM")
            .with_parent(sct(40733004)),
        TerminologyConcept::new(sct(233604007), "Pneumonia")
            .with_parent(sct(40733004))
            .with_parent(sct(50043002)),
        TerminologyConcept::new(sct(386661006), "Fever")
            .with_synonym("Pyrexia")
            .with_synonym("Febrile")
            .with_parent(sct(404684003)),
        TerminologyConcept::new(sct(422400008), "Vomiting")
            .with_synonym("Emesis")
            .with_parent(sct(404684003)),
        TerminologyConcept::new(sct(62315008), "Diarrhea")
            .with_synonym("Loose stools")
            .with_parent(sct(404684003)),
        TerminologyConcept::new(sct(271807003), "Eruption of skin")
            .with_synonym("Rash")
            .with_parent(sct(404684003)),
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_concepts_load_cleanly() {
        let store = TerminologyStore::load(builtin_concepts()).unwrap();
        assert_eq!(store.len(), 11);

        // Pneumonia sits under both infection and the respiratory
        // branch, and transitively under disease.
        assert!(store.is_descendant_of(sct(233604007), sct(40733004)));
        assert!(store.is_descendant_of(sct(233604007), sct(50043002)));
        assert!(store.is_descendant_of(sct(233604007), sct(64572001)));
        assert!(!store.is_descendant_of(sct(386661006), sct(64572001)));
    }

    #[test]
    fn test_builtin_synonyms_are_searchable() {
        let store = TerminologyStore::load(builtin_concepts()).unwrap();
        let hits = store.search("pyrexia", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, sct(386661006));
        assert_eq!(hits[0].subtitle.as_deref(), Some("Pyrexia"));
    }
}
