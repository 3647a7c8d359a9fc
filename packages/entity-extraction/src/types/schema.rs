//! Field schemas - the per-entity-type description of what to extract.
//!
//! A [`FieldSchema`] is an ordered set of [`FieldSpec`]s. Each spec names
//! a field, gives it a semantic kind and a coverage weight, and carries
//! the declarative inputs each extraction strategy evaluates generically:
//! JSON-LD path specs, CSS selector candidates, meta tag names, and
//! regex patterns. Schemas are configuration, built once at startup and
//! immutable at request time.
//!
//! # Example
//!
//! ```rust,ignore
//! let spec = FieldSpec::new("founded", FieldKind::Year)
//!     .weight(0.08)
//!     .hint("The year the company was founded")
//!     .metadata_path("foundingDate")
//!     .pattern(r"(?i)founded(?:\s+in)?[:\s]+(\d{4})");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The entity type a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A company page (about page, corporate profile)
    Company,
    /// A social media profile page
    SocialProfile,
    /// A business directory listing
    BusinessListing,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Company => write!(f, "company"),
            EntityKind::SocialProfile => write!(f, "social_profile"),
            EntityKind::BusinessListing => write!(f, "business_listing"),
        }
    }
}

/// Semantic type of a field; drives validation and normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Short text (names, locations). 2 to 200 chars after cleanup.
    Text,
    /// Long-form text (descriptions, bios). 10 to 2000 chars.
    LongText,
    /// A count. Accepts K/M/B suffixes and numeric ranges; ranges are
    /// averaged to one integer.
    Count,
    /// A 4-digit year inside the accepted window.
    Year,
    /// An absolute URL. CDN and image-resource URLs are rejected.
    Url,
    /// An enum-like category label.
    Category,
    /// A comma-separated list of short strings.
    List,
    /// A phone number, normalized to digits and a leading plus.
    Phone,
    /// A country name, mapped to an ISO-style two-letter code.
    Country,
}

/// Declarative description of one extractable field.
///
/// The per-strategy inputs (`metadata_paths`, `selectors`, `meta_names`,
/// `patterns`, `context_patterns`) are ordered most-specific first; every
/// strategy takes the first of its inputs that yields a usable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique within a schema
    pub name: String,

    /// Semantic kind, drives validation
    pub kind: FieldKind,

    /// Contribution to the coverage portion of the confidence score.
    /// Weights across a schema sum to at most 1.0.
    pub weight: f32,

    /// Human-readable description, used as an extraction hint for
    /// remote structured extraction
    pub hint: String,

    /// Ordered dotted path specs into embedded metadata objects
    /// (e.g. `"address.addressLocality"`)
    #[serde(default)]
    pub metadata_paths: Vec<String>,

    /// Ordered CSS selector candidates
    #[serde(default)]
    pub selectors: Vec<String>,

    /// Meta tag names (og:/twitter:/plain) whose content maps to this field
    #[serde(default)]
    pub meta_names: Vec<String>,

    /// Ordered regex patterns applied to the raw document
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Looser sentence-level patterns applied to tag-stripped text
    #[serde(default)]
    pub context_patterns: Vec<String>,
}

impl FieldSpec {
    /// Create a new field spec with no extraction inputs.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            weight: 0.0,
            hint: String::new(),
            metadata_paths: Vec::new(),
            selectors: Vec::new(),
            meta_names: Vec::new(),
            patterns: Vec::new(),
            context_patterns: Vec::new(),
        }
    }

    /// Set the coverage weight.
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the human-readable extraction hint.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Add a metadata path spec.
    pub fn metadata_path(mut self, path: impl Into<String>) -> Self {
        self.metadata_paths.push(path.into());
        self
    }

    /// Add a CSS selector candidate.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Add a meta tag name.
    pub fn meta_name(mut self, name: impl Into<String>) -> Self {
        self.meta_names.push(name.into());
        self
    }

    /// Add a raw-document regex pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Add a contextual text pattern.
    pub fn context_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.context_patterns.push(pattern.into());
        self
    }
}

/// An ordered, immutable set of field specs for one entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// The entity type this schema describes
    pub entity: EntityKind,

    fields: IndexMap<String, FieldSpec>,
}

impl FieldSchema {
    /// Create an empty schema for an entity type.
    pub fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            fields: IndexMap::new(),
        }
    }

    /// Add a field spec. Later specs with the same name replace earlier ones.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.insert(spec.name.clone(), spec);
        self
    }

    /// Look up a field spec by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Whether the schema defines a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate field specs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// Number of fields in the schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of all field weights. At most 1.0 for the built-in schemas.
    pub fn total_weight(&self) -> f32 {
        self.fields.values().map(|f| f.weight).sum()
    }

    /// Render the schema as the field map a remote structured-extraction
    /// endpoint expects: field name to `{type, description}`.
    pub fn to_remote_schema(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for spec in self.fields.values() {
            map.insert(
                spec.name.clone(),
                serde_json::json!({
                    "type": remote_type_name(spec.kind),
                    "description": spec.hint,
                }),
            );
        }
        serde_json::Value::Object(map)
    }
}

fn remote_type_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Count | FieldKind::Year => "number",
        FieldKind::List => "array",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spec_builder() {
        let spec = FieldSpec::new("founded", FieldKind::Year)
            .weight(0.08)
            .hint("Founding year")
            .metadata_path("foundingDate")
            .pattern(r"(?i)founded[:\s]+(\d{4})");

        assert_eq!(spec.name, "founded");
        assert_eq!(spec.kind, FieldKind::Year);
        assert_eq!(spec.weight, 0.08);
        assert_eq!(spec.metadata_paths, vec!["foundingDate"]);
        assert_eq!(spec.patterns.len(), 1);
    }

    #[test]
    fn test_schema_preserves_field_order() {
        let schema = FieldSchema::new(EntityKind::Company)
            .field(FieldSpec::new("company_name", FieldKind::Text))
            .field(FieldSpec::new("description", FieldKind::LongText))
            .field(FieldSpec::new("founded", FieldKind::Year));

        let names: Vec<_> = schema.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["company_name", "description", "founded"]);
    }

    #[test]
    fn test_remote_schema_rendering() {
        let schema = FieldSchema::new(EntityKind::Company)
            .field(
                FieldSpec::new("company_name", FieldKind::Text)
                    .hint("The legal or trading name"),
            )
            .field(FieldSpec::new("followers", FieldKind::Count));

        let remote = schema.to_remote_schema();
        assert_eq!(remote["company_name"]["type"], "string");
        assert_eq!(remote["company_name"]["description"], "The legal or trading name");
        assert_eq!(remote["followers"]["type"], "number");
    }
}
