//! Pattern strategy: per-field regexes over the raw document.
//!
//! Patterns are applied in order; the first match wins the field. A
//! match with several capture groups (e.g. an employee-count range) is
//! joined with a hyphen so downstream validation sees one composite
//! candidate like `"120-450"`.

use std::sync::Arc;

use regex::Regex;

use crate::types::document::AcquiredDocument;
use crate::types::record::{PartialRecord, StrategyKind};
use crate::types::schema::FieldSchema;

use super::Strategy;

pub struct PatternStrategy {
    compiled: Vec<(String, Vec<Regex>)>,
}

impl PatternStrategy {
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        Self {
            compiled: compile_patterns(&schema, |spec| &spec.patterns),
        }
    }
}

/// Compile one pattern list per field, dropping patterns that fail to
/// compile.
pub(super) fn compile_patterns(
    schema: &FieldSchema,
    list: impl Fn(&crate::types::schema::FieldSpec) -> &Vec<String>,
) -> Vec<(String, Vec<Regex>)> {
    schema
        .fields()
        .filter(|spec| !list(spec).is_empty())
        .map(|spec| {
            let regexes = list(spec)
                .iter()
                .filter_map(|p| match Regex::new(p) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::debug!(field = %spec.name, pattern = %p, error = %e, "invalid pattern skipped");
                        None
                    }
                })
                .collect();
            (spec.name.clone(), regexes)
        })
        .collect()
}

/// First match of any regex in the list, composite captures joined
/// with a hyphen.
pub(super) fn first_match(regexes: &[Regex], text: &str) -> Option<String> {
    for re in regexes {
        if let Some(caps) = re.captures(text) {
            let groups: Vec<&str> = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .collect();
            let value = match groups.len() {
                0 => caps.get(0).map(|m| m.as_str().trim().to_string()),
                1 => Some(groups[0].to_string()),
                _ => Some(groups.join("-")),
            };
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                return Some(value);
            }
        }
    }
    None
}

impl Strategy for PatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    fn extract(&self, doc: &AcquiredDocument) -> PartialRecord {
        let mut partial = PartialRecord::new();
        let text = doc.raw_text();
        if text.is_empty() {
            return partial;
        }
        for (field, regexes) in &self.compiled {
            if let Some(value) = first_match(regexes, text) {
                partial.insert(field, value);
            }
        }
        partial
    }
}
