//! Contextual text strategy.
//!
//! The lowest-priority, least-trusted source: scans tag-stripped plain
//! text for sentence-level cues such as "Founded in 1998" or
//! "Headquartered in Berlin" using each field's looser context
//! patterns. Useful on pages with no structure at all; consolidation
//! only takes these values when nothing better matched.

use std::sync::Arc;

use regex::Regex;

use crate::types::document::AcquiredDocument;
use crate::types::record::{PartialRecord, StrategyKind};
use crate::types::schema::FieldSchema;

use super::pattern::{compile_patterns, first_match};
use super::Strategy;

pub struct ContextualStrategy {
    compiled: Vec<(String, Vec<Regex>)>,
}

impl ContextualStrategy {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        Self {
            compiled: compile_patterns(&schema, |spec| &spec.context_patterns),
        }
    }
}

impl Strategy for ContextualStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Contextual
    }

    fn extract(&self, doc: &AcquiredDocument) -> PartialRecord {
        let mut partial = PartialRecord::new();
        let text = doc.plain_text();
        if text.is_empty() {
            return partial;
        }
        for (field, regexes) in &self.compiled {
            if let Some(value) = first_match(regexes, &text) {
                partial.insert(field, value);
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
                    FieldSpec::new("founded", FieldKind::Year)
                        .context_pattern(r"(?i)founded in\s+(\d{4})"),
                )
                .field(
                    FieldSpec::new("headquarters", FieldKind::Text)
                        .context_pattern(r"(?i)headquartered in\s+([A-Z][A-Za-z\s,]{2,60})"),
                ),
        )
    }

    #[test]
    fn test_cues_found_in_stripped_text() {
        let html = "<div><p>We were <b>founded in</b> 2004 and are\nheadquartered in Lisbon, Portugal.</p></div>";
        let doc = AcquiredDocument::new("https://example.com", "test").with_html(html);

        let strategy = ContextualStrategy::new(schema());
        let partial = strategy.extract(&doc);
        assert_eq!(partial.get("founded"), Some("2004"));
        assert_eq!(partial.get("headquarters"), Some("Lisbon, Portugal"));
    }

    #[test]
    fn test_works_on_markdown_documents() {
        let doc = AcquiredDocument::new("https://example.com", "test")
            .with_markdown("About us. Founded in 2010, we build tools.");
        let strategy = ContextualStrategy::new(schema());
        assert_eq!(strategy.extract(&doc).get("founded"), Some("2010"));
    }
}
