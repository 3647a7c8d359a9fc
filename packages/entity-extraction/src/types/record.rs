//! Partial and consolidated records.
//!
//! A [`PartialRecord`] is the output of exactly one strategy over one
//! document; it is ephemeral and discarded after consolidation. A
//! [`ConsolidatedRecord`] is the merged, validated result: at most one
//! value per field, each carrying the strategy that supplied it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One extraction technique, in fixed consolidation priority order.
///
/// `Remote` values come from a hosted structured-extraction endpoint and
/// outrank everything local; among the local strategies, machine-readable
/// metadata is the most trusted and loose contextual text the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Remote structured extraction (validated server-side payload)
    Remote,
    /// Embedded machine-readable metadata blocks (JSON-LD)
    Embedded,
    /// DOM selector matching
    Selector,
    /// Social/meta tag reading
    Meta,
    /// Regex patterns over the raw document
    Pattern,
    /// Loose cues over tag-stripped text
    Contextual,
}

/// Fixed priority order used by consolidation: first entry wins first.
pub const STRATEGY_PRIORITY: [StrategyKind; 6] = [
    StrategyKind::Remote,
    StrategyKind::Embedded,
    StrategyKind::Selector,
    StrategyKind::Meta,
    StrategyKind::Pattern,
    StrategyKind::Contextual,
];

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Remote => write!(f, "remote-structured"),
            StrategyKind::Embedded => write!(f, "embedded-metadata"),
            StrategyKind::Selector => write!(f, "dom-selector"),
            StrategyKind::Meta => write!(f, "meta-tag"),
            StrategyKind::Pattern => write!(f, "text-pattern"),
            StrategyKind::Contextual => write!(f, "contextual-text"),
        }
    }
}

/// A field name to raw candidate value map from a single strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialRecord {
    values: IndexMap<String, String>,
}

impl PartialRecord {
    /// Create an empty partial record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate value for a field. Blank values are ignored;
    /// the first candidate per field wins within one strategy.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.values
            .entry(field.into())
            .or_insert_with(|| trimmed.to_string());
    }

    /// Get the candidate for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Iterate candidates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of candidate fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this partial has no candidates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A validated field value together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The normalized value
    pub value: String,

    /// Which strategy supplied it
    pub source: StrategyKind,
}

/// The merged record: schema-ordered, at most one value per field, every
/// value already validated and normalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    fields: IndexMap<String, FieldValue>,
}

impl ConsolidatedRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validated value with its provenance.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>, source: StrategyKind) {
        self.fields.insert(
            field.into(),
            FieldValue {
                value: value.into(),
                source,
            },
        );
    }

    /// Get the full entry for a field.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Get just the value for a field.
    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|f| f.value.as_str())
    }

    /// Get the strategy that supplied a field.
    pub fn source_of(&self, field: &str) -> Option<StrategyKind> {
        self.fields.get(field).map(|f| f.source)
    }

    /// Whether the record holds a value for this field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate entries in insertion (schema) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of filled fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was filled.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Distinct strategies that contributed at least one field, in first
    /// contribution order.
    pub fn strategies_used(&self) -> Vec<StrategyKind> {
        let mut seen = Vec::new();
        for value in self.fields.values() {
            if !seen.contains(&value.source) {
                seen.push(value.source);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ignores_blank_and_keeps_first() {
        let mut partial = PartialRecord::new();
        partial.insert("name", "   ");
        assert!(partial.is_empty());

        partial.insert("name", "Acme Corp");
        partial.insert("name", "Other Name");
        assert_eq!(partial.get("name"), Some("Acme Corp"));
    }

    #[test]
    fn test_record_provenance() {
        let mut record = ConsolidatedRecord::new();
        record.insert("company_name", "Acme Corp", StrategyKind::Embedded);
        record.insert("industry", "Software", StrategyKind::Selector);

        assert_eq!(record.source_of("company_name"), Some(StrategyKind::Embedded));
        assert_eq!(record.value_of("industry"), Some("Software"));
        assert_eq!(
            record.strategies_used(),
            vec![StrategyKind::Embedded, StrategyKind::Selector]
        );
    }

    #[test]
    fn test_strategies_used_deduplicates() {
        let mut record = ConsolidatedRecord::new();
        record.insert("a", "1", StrategyKind::Pattern);
        record.insert("b", "2", StrategyKind::Pattern);
        assert_eq!(record.strategies_used(), vec![StrategyKind::Pattern]);
    }
}
