//! Meta-tag strategy.
//!
//! Reads the small fixed map of social/meta tag names each field
//! declares (`og:title`, `twitter:description`, plain `description`).
//! The first occurrence per field wins. Both `name=` and `property=`
//! attributes are honored since sites use them interchangeably.

use std::sync::{Arc, LazyLock};

use scraper::{Html, Selector};

use crate::types::document::AcquiredDocument;
use crate::types::record::{PartialRecord, StrategyKind};
use crate::types::schema::FieldSchema;

use super::Strategy;

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());

pub struct MetaTagStrategy {
    schema: Arc<FieldSchema>,
}

impl MetaTagStrategy {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        Self { schema }
    }
}

impl Strategy for MetaTagStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Meta
    }

    fn extract(&self, doc: &AcquiredDocument) -> PartialRecord {
        let mut partial = PartialRecord::new();
        let Some(html) = doc.html.as_deref() else {
            return partial;
        };
        let parsed = Html::parse_document(html);

        // One pass over the document's meta tags, first occurrence per
        // tag name wins.
        let mut seen: Vec<(String, String)> = Vec::new();
        for element in parsed.select(&META_SELECTOR) {
            let tag = element
                .value()
                .attr("property")
                .or_else(|| element.value().attr("name"));
            let (Some(tag), Some(content)) = (tag, element.value().attr("content")) else {
                continue;
            };
            let content = content.trim();
            if content.is_empty() || seen.iter().any(|(t, _)| t == tag) {
                continue;
            }
            seen.push((tag.to_string(), content.to_string()));
        }

        for spec in self.schema.fields() {
            for name in &spec.meta_names {
                if let Some((_, content)) = seen.iter().find(|(tag, _)| tag == name) {
                    partial.insert(&spec.name, content.clone());
                    break;
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

    fn schema() -> Arc<FieldSchema> {
        Arc::new(
            FieldSchema::new(EntityKind::Company)
                .field(
                    FieldSpec::new("company_name", FieldKind::Text)
                        .meta_name("og:site_name")
                        .meta_name("og:title"),
                )
                .field(
                    FieldSpec::new("description", FieldKind::LongText)
                        .meta_name("og:description")
                        .meta_name("description"),
                ),
        )
    }

    fn doc(html: &str) -> AcquiredDocument {
        AcquiredDocument::new("https://example.com", "test").with_html(html)
    }

    #[test]
    fn test_reads_property_and_name_attributes() {
        let html = r#"<head>
            <meta property="og:title" content="Acme Corp" />
            <meta name="description" content="We make everything, worldwide." />
        </head>"#;

        let strategy = MetaTagStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("company_name"), Some("Acme Corp"));
        assert_eq!(partial.get("description"), Some("We make everything, worldwide."));
    }

    #[test]
    fn test_first_occurrence_per_tag_wins() {
        let html = r#"
            <meta property="og:title" content="First Title" />
            <meta property="og:title" content="Second Title" />"#;

        let strategy = MetaTagStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("company_name"), Some("First Title"));
    }

    #[test]
    fn test_tag_priority_follows_spec_order() {
        let html = r#"
            <meta property="og:title" content="Title Tag" />
            <meta property="og:site_name" content="Site Name Tag" />"#;

        let strategy = MetaTagStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("company_name"), Some("Site Name Tag"));
    }
}
