//! Strategy extractors - independent techniques over one document.
//!
//! Each strategy scans the same acquired document and returns a partial
//! field-to-candidate map. Strategies are order-insensitive and read-only
//! over the document; none depends on another's output, and none may
//! panic on malformed input. A strategy that cannot work with what the
//! document offers (e.g. no HTML for a DOM strategy) returns an empty
//! partial.

mod contextual;
mod embedded;
mod meta;
mod pattern;
mod selector;

pub use contextual::ContextualStrategy;
pub use embedded::EmbeddedMetadataStrategy;
pub use meta::MetaTagStrategy;
pub use pattern::PatternStrategy;
pub use selector::SelectorStrategy;

use std::sync::Arc;

use crate::types::document::AcquiredDocument;
use crate::types::record::{PartialRecord, StrategyKind};
use crate::types::schema::FieldSchema;

/// One extraction technique.
pub trait Strategy: Send + Sync {
    /// Which strategy this is, for consolidation priority and provenance.
    fn kind(&self) -> StrategyKind;

    /// Scan one document and return candidates. Must not panic; returns
    /// an empty partial on any internal failure.
    fn extract(&self, doc: &AcquiredDocument) -> PartialRecord;
}

/// Build the full local strategy set for a schema.
pub fn default_strategies(schema: &Arc<FieldSchema>) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(EmbeddedMetadataStrategy::new(Arc::clone(schema))),
        Box::new(SelectorStrategy::new(Arc::clone(schema))),
        Box::new(MetaTagStrategy::new(Arc::clone(schema))),
        Box::new(PatternStrategy::new(Arc::clone(schema))),
        Box::new(ContextualStrategy::new(Arc::clone(schema))),
    ]
}

/// Run every strategy over a document and collect the non-empty partials.
pub fn run_all(
    strategies: &[Box<dyn Strategy>],
    doc: &AcquiredDocument,
) -> Vec<(StrategyKind, PartialRecord)> {
    let mut partials = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let partial = strategy.extract(doc);
        tracing::debug!(
            strategy = %strategy.kind(),
            url = %doc.url,
            fields = partial.len(),
            "strategy pass complete"
        );
        if !partial.is_empty() {
            partials.push((strategy.kind(), partial));
        }
    }
    partials
}
