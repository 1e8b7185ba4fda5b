//! Feature tokens: the normalized `key -> value` observations for one
//! clinical encounter.
//!
//! The token set is produced by the form-state extractor once per
//! encounter snapshot and is immutable for the duration of one
//! evaluation pass. Keys are either namespaced strings following the
//! `sick.<domain>.<field>.<value>` protocol (e.g.
//! `sick.pe.lungs.crackles`) or scalar observation names
//! (`age_months`, `fever_c`), plus terminology references under the
//! `sct:` scheme.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// The value side of a feature token.
///
/// Wire form (extractor JSON): `null` is absent, `true` is a bare
/// presence marker, strings and numbers carry data.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Key explicitly recorded as absent.
    Absent,
    /// Presence marker with no attached data.
    Present,
    /// Free-text or coded string value.
    Text(String),
    /// Numeric value (durations, vitals, counts).
    Number(f64),
}

impl FeatureValue {
    /// Numeric view of this value. A `Text` value that parses as a
    /// float counts as numeric; extractors emit numerals as strings
    /// in places.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(s) => s.trim().parse().ok(),
            FeatureValue::Absent | FeatureValue::Present => None,
        }
    }

    /// String view of this value. Only `Text` carries a string; the
    /// marker variants never coerce.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FeatureValue::Absent)
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Absent => serializer.serialize_unit(),
            FeatureValue::Present => serializer.serialize_bool(true),
            FeatureValue::Text(s) => serializer.serialize_str(s),
            FeatureValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

struct FeatureValueVisitor;

impl<'de> Visitor<'de> for FeatureValueVisitor {
    type Value = FeatureValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, a boolean marker, a string, or a number")
    }

    fn visit_unit<E: de::Error>(self) -> Result<FeatureValue, E> {
        Ok(FeatureValue::Absent)
    }

    fn visit_none<E: de::Error>(self) -> Result<FeatureValue, E> {
        Ok(FeatureValue::Absent)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FeatureValue, E> {
        // A false marker carries the same information as no marker.
        Ok(if v {
            FeatureValue::Present
        } else {
            FeatureValue::Absent
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FeatureValue, E> {
        Ok(FeatureValue::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FeatureValue, E> {
        Ok(FeatureValue::Number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FeatureValue, E> {
        Ok(FeatureValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FeatureValue, E> {
        Ok(FeatureValue::Number(v as f64))
    }
}

impl<'de> Deserialize<'de> for FeatureValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<FeatureValue, D::Error> {
        deserializer.deserialize_any(FeatureValueVisitor)
    }
}

/// One encounter's flat collection of feature tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureTokenSet {
    tokens: HashMap<String, FeatureValue>,
}

impl FeatureTokenSet {
    pub fn new() -> Self {
        FeatureTokenSet {
            tokens: HashMap::new(),
        }
    }

    /// Record a token. Later inserts for the same key replace earlier
    /// ones (the extractor emits each key at most once).
    pub fn insert(&mut self, key: impl Into<String>, value: FeatureValue) {
        self.tokens.insert(key.into(), value);
    }

    /// Explicit lookup: `None` means the extractor never emitted the
    /// key, which every operator treats separately from a recorded
    /// `Absent`.
    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.tokens.get(key)
    }

    /// Numeric view of a token, if it has one.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FeatureValue::as_number)
    }

    /// String view of a token, if it has one.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FeatureValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tokens.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(|k| k.as_str())
    }
}

impl FromIterator<(String, FeatureValue)> for FeatureTokenSet {
    fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
        FeatureTokenSet {
            tokens: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
