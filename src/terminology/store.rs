// Terminology store: read-only concept table plus a materialized
// transitive-ancestor index for subsumption queries.
//
// The store is built once at startup from a fixed concept table and
// never mutated afterwards, so concurrent reads from parallel
// evaluation calls need no locking. Construction is all-or-nothing:
// a table that cannot be indexed (duplicate ids, dangling parents, an
// is-a cycle) is a fatal load error, never a per-query one.

use super::core::{ConceptId, TerminologyConcept};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminologyError {
    #[error("duplicate concept id {0}")]
    DuplicateConcept(ConceptId),

    #[error("concept {concept} references unknown parent {parent}")]
    UnknownParent {
        concept: ConceptId,
        parent: ConceptId,
    },

    #[error("is-a cycle involving concept {0}")]
    Cycle(ConceptId),
}

/// One hit from a terminology search, shaped for an authoring picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: ConceptId,
    /// Preferred label of the concept.
    pub term: String,
    /// The synonym that matched, when the hit came in via a synonym
    /// rather than the preferred label.
    pub subtitle: Option<String>,
}

/// Read-only index over a concept subset: metadata lookup, ancestry,
/// and free-text search.
#[derive(Debug, Clone)]
pub struct TerminologyStore {
    concepts: HashMap<ConceptId, TerminologyConcept>,
    /// Transitive is-a closure: concept -> every ancestor.
    ancestors: HashMap<ConceptId, HashSet<ConceptId>>,
}

impl TerminologyStore {
    /// Build the store from a concept table. The whole table must
    /// index cleanly or the store is unusable.
    pub fn load(table: Vec<TerminologyConcept>) -> Result<Self, TerminologyError> {
        let mut concepts: HashMap<ConceptId, TerminologyConcept> =
            HashMap::with_capacity(table.len());
        for concept in table {
            let id = concept.id;
            if concepts.insert(id, concept).is_some() {
                return Err(TerminologyError::DuplicateConcept(id));
            }
        }

        for concept in concepts.values() {
            for parent in &concept.parents {
                if !concepts.contains_key(parent) {
                    return Err(TerminologyError::UnknownParent {
                        concept: concept.id,
                        parent: *parent,
                    });
                }
            }
        }

        let ancestors = build_transitive_closure(&concepts)?;

        tracing::info!(concepts = concepts.len(), "terminology store loaded");

        Ok(TerminologyStore {
            concepts,
            ancestors,
        })
    }

    /// Look up a concept record.
    pub fn concept(&self, id: ConceptId) -> Option<&TerminologyConcept> {
        self.concepts.get(&id)
    }

    pub fn contains(&self, id: ConceptId) -> bool {
        self.concepts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Every ancestor of `id` in the is-a closure. Unknown ids have no
    /// ancestors.
    pub fn ancestors_of(&self, id: ConceptId) -> HashSet<ConceptId> {
        self.ancestors.get(&id).cloned().unwrap_or_default()
    }

    /// Strict descendant test: true iff `candidate` is not `ancestor`
    /// itself and `ancestor` appears in `candidate`'s transitive parent
    /// chain. Unknown ids on either side are a non-match, never an
    /// error.
    pub fn is_descendant_of(&self, candidate: ConceptId, ancestor: ConceptId) -> bool {
        if candidate == ancestor {
            return false;
        }
        self.ancestors
            .get(&candidate)
            .map_or(false, |set| set.contains(&ancestor))
    }

    /// Case-insensitive substring search over preferred labels and
    /// synonyms. Exact-prefix matches rank before plain substring
    /// matches, then alphabetical by term, then by id; truncated to
    /// `limit`. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &TerminologyConcept, Option<&str>)> = Vec::new();
        for concept in self.concepts.values() {
            // Preferred label is consulted first so that at equal rank
            // the hit reads as a label match, not a synonym match.
            let mut best: Option<(u8, Option<&str>)> = match_rank(&concept.term, &needle)
                .map(|rank| (rank, None));
            for synonym in &concept.synonyms {
                if let Some(rank) = match_rank(synonym, &needle) {
                    let better = match best {
                        Some((existing, _)) => rank < existing,
                        None => true,
                    };
                    if better {
                        best = Some((rank, Some(synonym.as_str())));
                    }
                }
            }
            if let Some((rank, via)) = best {
                ranked.push((rank, concept, via));
            }
        }

        ranked.sort_by(|(rank_a, a, _), (rank_b, b, _)| {
            rank_a
                .cmp(rank_b)
                .then_with(|| a.term.to_lowercase().cmp(&b.term.to_lowercase()))
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(limit);

        ranked
            .into_iter()
            .map(|(_, concept, via)| SearchHit {
                id: concept.id,
                term: concept.term.clone(),
                subtitle: via.map(String::from),
            })
            .collect()
    }
}

/// Rank a haystack against the lowercased needle: 0 for a prefix
/// match, 1 for any other substring match.
fn match_rank(haystack: &str, needle: &str) -> Option<u8> {
    let hay = haystack.to_lowercase();
    if hay.starts_with(needle) {
        Some(0)
    } else if hay.contains(needle) {
        Some(1)
    } else {
        None
    }
}

/// Materialize every concept's full ancestor set by walking parents
/// before children (Kahn's algorithm over the is-a edges). A cycle
/// leaves concepts unprocessed and fails the load.
fn build_transitive_closure(
    concepts: &HashMap<ConceptId, TerminologyConcept>,
) -> Result<HashMap<ConceptId, HashSet<ConceptId>>, TerminologyError> {
    let mut children: HashMap<ConceptId, Vec<ConceptId>> = HashMap::new();
    let mut remaining_parents: HashMap<ConceptId, usize> = HashMap::new();

    for concept in concepts.values() {
        remaining_parents.insert(concept.id, concept.parents.len());
        for parent in &concept.parents {
            children.entry(*parent).or_default().push(concept.id);
        }
    }

    let mut queue: VecDeque<ConceptId> = remaining_parents
        .iter()
        .filter(|(_, &count)| count == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut ancestors: HashMap<ConceptId, HashSet<ConceptId>> =
        HashMap::with_capacity(concepts.len());
    let mut processed = 0usize;

    while let Some(id) = queue.pop_front() {
        processed += 1;

        let mut set = HashSet::new();
        if let Some(concept) = concepts.get(&id) {
            for parent in &concept.parents {
                set.insert(*parent);
                if let Some(parent_ancestors) = ancestors.get(parent) {
                    set.extend(parent_ancestors.iter().copied());
                }
            }
        }
        ancestors.insert(id, set);

        if let Some(kids) = children.get(&id) {
            for child in kids {
                if let Some(count) = remaining_parents.get_mut(child) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push_back(*child);
                    }
                }
            }
        }
    }

    if processed < concepts.len() {
        // Deterministic report: smallest id still stuck in the cycle.
        let stuck = concepts
            .keys()
            .filter(|id| !ancestors.contains_key(id))
            .min()
            .copied();
        if let Some(id) = stuck {
            return Err(TerminologyError::Cycle(id));
        }
    }

    Ok(ancestors)
}

// =============================================================================
// Tests
// =============================================================================
