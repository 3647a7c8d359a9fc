//! Confidence scoring.
//!
//! A 0 to 100 estimate of how complete and trustworthy a consolidated
//! record is: weighted field coverage, plus a diversity bonus for the
//! number of distinct strategies that contributed, plus reliability
//! bonuses when the more-trusted strategies supplied values. This score
//! is the sole signal the fallback chain uses to decide whether to keep
//! trying other acquisition backends.

use crate::types::record::{ConsolidatedRecord, StrategyKind};
use crate::types::schema::FieldSchema;

/// Bonus when embedded machine-readable metadata contributed a field.
const EMBEDDED_BONUS: f32 = 15.0;

/// Bonus when DOM-selector matching contributed a field.
const SELECTOR_BONUS: f32 = 10.0;

/// Per-strategy diversity bonus, capped.
const DIVERSITY_STEP: f32 = 0.1;
const DIVERSITY_CAP: f32 = 0.3;

/// Score a consolidated record against its schema.
pub fn score(schema: &FieldSchema, record: &ConsolidatedRecord) -> f32 {
    let coverage: f32 = schema
        .fields()
        .filter(|spec| record.contains(&spec.name))
        .map(|spec| spec.weight)
        .sum();

    let strategies = record.strategies_used();
    let diversity = (DIVERSITY_STEP * strategies.len() as f32).min(DIVERSITY_CAP);

    let mut total = coverage * 100.0 + diversity * 100.0;
    if strategies.contains(&StrategyKind::Embedded) {
        total += EMBEDDED_BONUS;
    }
    if strategies.contains(&StrategyKind::Selector) {
        total += SELECTOR_BONUS;
    }

    total.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::{EntityKind, FieldKind, FieldSpec};

    fn schema() -> FieldSchema {
        FieldSchema::new(EntityKind::Company)
            .field(FieldSpec::new("company_name", FieldKind::Text).weight(0.25))
            .field(FieldSpec::new("description", FieldKind::LongText).weight(0.20))
            .field(FieldSpec::new("industry", FieldKind::Category).weight(0.15))
            .field(FieldSpec::new("company_size", FieldKind::Count).weight(0.10))
            .field(FieldSpec::new("headquarters", FieldKind::Text).weight(0.10))
            .field(FieldSpec::new("founded", FieldKind::Year).weight(0.08))
            .field(FieldSpec::new("website", FieldKind::Url).weight(0.07))
            .field(FieldSpec::new("specialties", FieldKind::List).weight(0.05))
    }

    #[test]
    fn test_empty_record_scores_zero() {
        assert_eq!(score(&schema(), &ConsolidatedRecord::new()), 0.0);
    }

    #[test]
    fn test_coverage_and_bonuses() {
        let mut record = ConsolidatedRecord::new();
        record.insert("company_name", "Acme Corp", StrategyKind::Embedded);
        record.insert("industry", "Software", StrategyKind::Selector);

        // coverage 0.40 -> 40, diversity 2 * 0.1 -> 20, embedded 15,
        // selector 10
        let s = score(&schema(), &record);
        assert!((s - 85.0).abs() < f32::EPSILON, "got {s}");
    }

    #[test]
    fn test_diversity_bonus_is_capped() {
        let mut record = ConsolidatedRecord::new();
        record.insert("company_name", "Acme", StrategyKind::Meta);
        record.insert("description", "A fine description.", StrategyKind::Pattern);
        record.insert("industry", "Software", StrategyKind::Contextual);
        record.insert("founded", "1998", StrategyKind::Remote);

        // coverage 0.68 -> 68, diversity capped at 0.3 -> 30, no
        // reliability bonuses
        let s = score(&schema(), &record);
        assert!((s - 98.0).abs() < 0.001, "got {s}");
    }

    #[test]
    fn test_monotonic_in_field_coverage() {
        let mut record = ConsolidatedRecord::new();
        let mut last = 0.0;
        for (field, value) in [
            ("company_name", "Acme Corp"),
            ("description", "Long enough description."),
            ("industry", "Software"),
            ("company_size", "285"),
            ("headquarters", "Austin"),
            ("founded", "1998"),
            ("website", "https://acme.example.com"),
            ("specialties", "robots, lasers"),
        ] {
            record.insert(field, value, StrategyKind::Pattern);
            let s = score(&schema(), &record);
            assert!(s >= last, "score regressed: {s} < {last}");
            last = s;
        }
    }

    #[test]
    fn test_clamped_at_100() {
        let mut record = ConsolidatedRecord::new();
        for spec_name in [
            "company_name",
            "description",
            "industry",
            "company_size",
            "headquarters",
            "founded",
            "website",
            "specialties",
        ] {
            record.insert(spec_name, "value here", StrategyKind::Embedded);
        }
        record.insert("industry", "Software", StrategyKind::Selector);
        record.insert("founded", "1998", StrategyKind::Contextual);

        assert_eq!(score(&schema(), &record), 100.0);
    }
}
