//! Embedded-metadata strategy: JSON-LD blocks.
//!
//! Parses `<script type="application/ld+json">` blocks, keeps the
//! organization/person-shaped objects, and evaluates each field's
//! ordered metadata path specs generically against them. Address-like
//! sub-objects are synthesized into a composite `"City, Region,
//! Country"` string so a single path spec like `"address"` can fill a
//! headquarters field.

use std::sync::{Arc, LazyLock};

use scraper::{Html, Selector};
use serde_json::Value;

use crate::types::document::AcquiredDocument;
use crate::types::record::{PartialRecord, StrategyKind};
use crate::types::schema::FieldSchema;

use super::Strategy;

static JSON_LD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Schema.org types this strategy trusts as entity descriptions.
const ACCEPTED_TYPES: &[&str] = &[
    "Organization",
    "Corporation",
    "LocalBusiness",
    "Person",
    "ProfilePage",
    "WebSite",
];

pub struct EmbeddedMetadataStrategy {
    schema: Arc<FieldSchema>,
}

impl EmbeddedMetadataStrategy {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        Self { schema }
    }

    /// Collect the entity-typed objects from every JSON-LD block,
    /// flattening `@graph` arrays.
    fn candidate_objects(html: &str) -> Vec<Value> {
        let doc = Html::parse_document(html);
        let mut objects = Vec::new();
        for script in doc.select(&JSON_LD_SELECTOR) {
            let body: String = script.text().collect();
            let Ok(parsed) = serde_json::from_str::<Value>(&body) else {
                continue;
            };
            collect_entities(parsed, &mut objects);
        }
        objects
    }
}

fn collect_entities(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_entities(item, out);
            }
        }
        Value::Object(ref map) => {
            if let Some(graph) = map.get("@graph").cloned() {
                collect_entities(graph, out);
            }
            if type_is_accepted(map.get("@type")) {
                out.push(value);
            }
        }
        _ => {}
    }
}

fn type_is_accepted(type_field: Option<&Value>) -> bool {
    match type_field {
        Some(Value::String(t)) => ACCEPTED_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| ACCEPTED_TYPES.contains(&t)),
        _ => false,
    }
}

/// Evaluate a dotted path spec against a JSON object.
fn eval_path<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = object;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Render a metadata value as a candidate string.
///
/// Address-like objects become a composite `locality, region, country`
/// string; arrays are joined with commas; numbers are printed plainly.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_string).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = ["addressLocality", "addressRegion", "addressCountry"]
                .iter()
                .filter_map(|key| map.get(*key))
                .filter_map(value_to_string)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

impl Strategy for EmbeddedMetadataStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Embedded
    }

    fn extract(&self, doc: &AcquiredDocument) -> PartialRecord {
        let mut partial = PartialRecord::new();
        let Some(html) = doc.html.as_deref() else {
            return partial;
        };

        let objects = Self::candidate_objects(html);
        if objects.is_empty() {
            return partial;
        }

        for spec in self.schema.fields() {
            'paths: for path in &spec.metadata_paths {
                for object in &objects {
                    if let Some(value) = eval_path(object, path).and_then(value_to_string) {
                        partial.insert(&spec.name, value);
                        break 'paths;
                    }
                }
            }
        }
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::{EntityKind, FieldKind, FieldSpec};

    fn doc(html: &str) -> AcquiredDocument {
        AcquiredDocument::new("https://example.com", "test").with_html(html)
    }

    fn schema() -> Arc<FieldSchema> {
        Arc::new(
            FieldSchema::new(EntityKind::Company)
                .field(
                    FieldSpec::new("company_name", FieldKind::Text).metadata_path("name"),
                )
                .field(
                    FieldSpec::new("founded", FieldKind::Year).metadata_path("foundingDate"),
                )
                .field(
                    FieldSpec::new("headquarters", FieldKind::Text).metadata_path("address"),
                )
                .field(
                    FieldSpec::new("city", FieldKind::Text)
                        .metadata_path("address.addressLocality"),
                ),
        )
    }

    #[test]
    fn test_extracts_organization_block() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "Organization", "name": "Acme Corp", "foundingDate": "2005",
             "address": {"addressLocality": "Austin", "addressRegion": "TX",
                         "addressCountry": "United States"}}
            </script></head><body></body></html>"#;

        let strategy = EmbeddedMetadataStrategy::new(schema());
        let partial = strategy.extract(&doc(html));

        assert_eq!(partial.get("company_name"), Some("Acme Corp"));
        assert_eq!(partial.get("founded"), Some("2005"));
        assert_eq!(partial.get("headquarters"), Some("Austin, TX, United States"));
        assert_eq!(partial.get("city"), Some("Austin"));
    }

    #[test]
    fn test_walks_graph_arrays() {
        let html = r#"<script type="application/ld+json">
            {"@graph": [{"@type": "WebPage"}, {"@type": "Corporation", "name": "Graph Inc"}]}
            </script>"#;

        let strategy = EmbeddedMetadataStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("company_name"), Some("Graph Inc"));
    }

    #[test]
    fn test_rejects_untyped_and_malformed_blocks() {
        let html = r#"
            <script type="application/ld+json">{"name": "No Type Here"}</script>
            <script type="application/ld+json">{not even json</script>"#;

        let strategy = EmbeddedMetadataStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert!(partial.is_empty());
    }

    #[test]
    fn test_no_html_yields_empty_partial() {
        let strategy = EmbeddedMetadataStrategy::new(schema());
        let md = AcquiredDocument::new("https://example.com", "test").with_markdown("# Acme");
        assert!(strategy.extract(&md).is_empty());
    }
}
