//! Guideline key registry: the authoring-time catalog of every
//! feature-token key the encounter extractor emits.
//!
//! This is a read-only reference table powering the searchable key
//! picker in the rule editor; it carries no runtime logic. The
//! vocabulary must stay in lockstep with the extractor: a key the
//! extractor starts emitting is invisible to rule authors until it
//! gets a registry entry. Namespaced keys follow the
//! `sick.<domain>.<field>.<value>` protocol (`hpi` history fields,
//! `pe` exam fields); scalar observations and the coded working
//! diagnosis use bare names.

use serde::{Deserialize, Serialize};

/// Picker grouping for feature-token keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCategory {
    Demographics,
    Vitals,
    Duration,
    Complaint,
    HistoryFinding,
    ExamFinding,
    Diagnosis,
}

impl KeyCategory {
    pub fn label(&self) -> &'static str {
        match self {
            KeyCategory::Demographics => "Demographics",
            KeyCategory::Vitals => "Vitals",
            KeyCategory::Duration => "Duration",
            KeyCategory::Complaint => "Complaint",
            KeyCategory::HistoryFinding => "History finding",
            KeyCategory::ExamFinding => "Exam finding",
            KeyCategory::Diagnosis => "Diagnosis",
        }
    }
}

/// One catalog entry: the key itself, its picker group, and an
/// example value the authoring UI shows next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureKeyDescriptor {
    pub key: &'static str,
    pub category: KeyCategory,
    pub example: &'static str,
}

const fn entry(
    key: &'static str,
    category: KeyCategory,
    example: &'static str,
) -> FeatureKeyDescriptor {
    FeatureKeyDescriptor {
        key,
        category,
        example,
    }
}

/// The full key catalog, one entry per extractor-emitted key.
pub const FEATURE_KEY_REGISTRY: &[FeatureKeyDescriptor] = &[
    // Demographics
    entry("age_months", KeyCategory::Demographics, "7"),
    entry("sex", KeyCategory::Demographics, "F"),
    entry("weight_kg", KeyCategory::Demographics, "8.4"),
    // Vitals
    entry("fever_c", KeyCategory::Vitals, "38.5"),
    entry("heart_rate_bpm", KeyCategory::Vitals, "142"),
    entry("resp_rate_bpm", KeyCategory::Vitals, "34"),
    entry("spo2_pct", KeyCategory::Vitals, "97"),
    // Duration
    entry("symptom_duration_days", KeyCategory::Duration, "3"),
    entry("fever_duration_hours", KeyCategory::Duration, "36"),
    // Presenting complaints (presence markers)
    entry("sick.hpi.complaint.fever", KeyCategory::Complaint, "true"),
    entry("sick.hpi.complaint.cough", KeyCategory::Complaint, "true"),
    entry("sick.hpi.complaint.vomiting", KeyCategory::Complaint, "true"),
    entry("sick.hpi.complaint.diarrhea", KeyCategory::Complaint, "true"),
    entry("sick.hpi.complaint.ear_pain", KeyCategory::Complaint, "true"),
    entry("sick.hpi.complaint.rash", KeyCategory::Complaint, "true"),
    // History findings
    entry(
        "sick.hpi.appearance.irritable",
        KeyCategory::HistoryFinding,
        "true",
    ),
    entry(
        "sick.hpi.feeding.refusing_feeds",
        KeyCategory::HistoryFinding,
        "true",
    ),
    entry(
        "sick.hpi.breathing.fast_breathing",
        KeyCategory::HistoryFinding,
        "true",
    ),
    entry(
        "sick.hpi.urination.decreased",
        KeyCategory::HistoryFinding,
        "true",
    ),
    entry("sick.hpi.stools.watery", KeyCategory::HistoryFinding, "true"),
    // Exam findings
    entry(
        "sick.pe.general_appearance.lethargic",
        KeyCategory::ExamFinding,
        "true",
    ),
    entry(
        "sick.pe.hydration.dry_mucous_membranes",
        KeyCategory::ExamFinding,
        "true",
    ),
    entry(
        "sick.pe.ear.red_and_bulging_with_pus",
        KeyCategory::ExamFinding,
        "true",
    ),
    entry("sick.pe.lungs.crackles", KeyCategory::ExamFinding, "true"),
    entry("sick.pe.lungs.crackles_l", KeyCategory::ExamFinding, "true"),
    entry("sick.pe.lungs.crackles_r", KeyCategory::ExamFinding, "true"),
    entry("sick.pe.lungs.wheeze", KeyCategory::ExamFinding, "true"),
    entry("sick.pe.abdomen.guarding", KeyCategory::ExamFinding, "true"),
    entry(
        "sick.pe.peristalsis.increased",
        KeyCategory::ExamFinding,
        "true",
    ),
    entry("sick.pe.skin.petechiae", KeyCategory::ExamFinding, "true"),
    entry(
        "sick.pe.neurological.nuchal_rigidity",
        KeyCategory::ExamFinding,
        "true",
    ),
    // Coded working diagnosis (terminology reference)
    entry("dx", KeyCategory::Diagnosis, "sct:233604007"),
];

/// Look up the descriptor for an exact key.
pub fn descriptor(key: &str) -> Option<&'static FeatureKeyDescriptor> {
    FEATURE_KEY_REGISTRY.iter().find(|d| d.key == key)
}

/// All keys in one picker group, in catalog order.
pub fn keys_in_category(category: KeyCategory) -> Vec<&'static FeatureKeyDescriptor> {
    FEATURE_KEY_REGISTRY
        .iter()
        .filter(|d| d.category == category)
        .collect()
}

/// Case-insensitive picker search over key names and example values.
/// Keys the query prefixes come first, then other hits, each in
/// catalog order.
pub fn search_keys(query: &str) -> Vec<&'static FeatureKeyDescriptor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut prefix_hits = Vec::new();
    let mut substring_hits = Vec::new();
    for descriptor in FEATURE_KEY_REGISTRY {
        let key = descriptor.key.to_lowercase();
        if key.starts_with(&needle) {
            prefix_hits.push(descriptor);
        } else if key.contains(&needle) || descriptor.example.to_lowercase().contains(&needle) {
            substring_hits.push(descriptor);
        }
    }
    prefix_hits.extend(substring_hits);
    prefix_hits
}

// =============================================================================
// Tests
// =============================================================================
