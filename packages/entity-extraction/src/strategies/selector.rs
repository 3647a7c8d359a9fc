//! DOM-selector strategy.
//!
//! Applies each field's ordered CSS selector candidates, most specific
//! first. The first candidate that matches an element with text longer
//! than 2 chars wins the field; for URL-valued fields the `href`
//! attribute is taken instead of the text.

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::types::document::AcquiredDocument;
use crate::types::record::{PartialRecord, StrategyKind};
use crate::types::schema::{FieldKind, FieldSchema};

use super::Strategy;

pub struct SelectorStrategy {
    /// Pre-parsed selector candidates per field, in schema order.
    /// Invalid selector strings are dropped at construction.
    compiled: Vec<(String, FieldKind, Vec<Selector>)>,
}

impl SelectorStrategy {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        let compiled = schema
            .fields()
            .filter(|spec| !spec.selectors.is_empty())
            .map(|spec| {
                let selectors = spec
                    .selectors
                    .iter()
                    .filter_map(|s| match Selector::parse(s) {
                        Ok(sel) => Some(sel),
                        Err(_) => {
                            tracing::debug!(field = %spec.name, selector = %s, "invalid selector skipped");
                            None
                        }
                    })
                    .collect();
                (spec.name.clone(), spec.kind, selectors)
            })
            .collect();
        Self { compiled }
    }
}

/// Element text with collapsed whitespace.
fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Strategy for SelectorStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Selector
    }

    fn extract(&self, doc: &AcquiredDocument) -> PartialRecord {
        let mut partial = PartialRecord::new();
        let Some(html) = doc.html.as_deref() else {
            return partial;
        };
        let parsed = Html::parse_document(html);

        for (field, kind, selectors) in &self.compiled {
            'candidates: for selector in selectors {
                for element in parsed.select(selector) {
                    let value = if *kind == FieldKind::Url {
                        element.value().attr("href").map(str::to_string)
                    } else {
                        let text = element_text(element);
                        (text.chars().count() > 2).then_some(text)
                    };
                    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                        partial.insert(field, value);
                        break 'candidates;
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
    use crate::types::schema::{EntityKind, FieldSpec};

    fn doc(html: &str) -> AcquiredDocument {
        AcquiredDocument::new("https://example.com", "test").with_html(html)
    }

    fn schema() -> Arc<FieldSchema> {
        Arc::new(
            FieldSchema::new(EntityKind::Company)
                .field(
                    FieldSpec::new("industry", FieldKind::Category)
                        .selector("dd.industry")
                        .selector(".top-card .info-item"),
                )
                .field(
                    FieldSpec::new("website", FieldKind::Url)
                        .selector("a.website-link"),
                ),
        )
    }

    #[test]
    fn test_first_matching_candidate_wins() {
        let html = r#"
            <dl><dd class="industry">Industry: Software</dd></dl>
            <div class="top-card"><span class="info-item">Ignored</span></div>"#;

        let strategy = SelectorStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("industry"), Some("Industry: Software"));
    }

    #[test]
    fn test_short_text_does_not_match() {
        let html = r#"<dd class="industry">IT</dd>"#;
        let strategy = SelectorStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("industry"), None);
    }

    #[test]
    fn test_url_fields_take_href() {
        let html = r#"<a class="website-link" href="https://acme.example.com">visit us</a>"#;
        let strategy = SelectorStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("website"), Some("https://acme.example.com"));
    }

    #[test]
    fn test_falls_through_to_later_candidate() {
        let html = r#"<div class="top-card"><span class="info-item">Renewable Energy</span></div>"#;
        let strategy = SelectorStrategy::new(schema());
        let partial = strategy.extract(&doc(html));
        assert_eq!(partial.get("industry"), Some("Renewable Energy"));
    }
}
