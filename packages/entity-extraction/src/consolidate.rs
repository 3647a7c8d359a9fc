//! Consolidation engine.
//!
//! Merges the partial maps from all strategies into one validated
//! record. Fields are visited in schema order; for each field the
//! strategies are tried in the fixed priority order and the first
//! candidate that validates wins, with the supplying strategy recorded
//! as provenance. Fields no strategy can fill validly are absent from
//! the record, never null-filled.

use crate::types::record::{ConsolidatedRecord, PartialRecord, StrategyKind, STRATEGY_PRIORITY};
use crate::types::schema::FieldSchema;
use crate::validate::validate;

/// Merge strategy partials into a consolidated record.
pub fn consolidate(
    schema: &FieldSchema,
    partials: &[(StrategyKind, PartialRecord)],
) -> ConsolidatedRecord {
    let mut record = ConsolidatedRecord::new();

    for spec in schema.fields() {
        for kind in STRATEGY_PRIORITY {
            let Some((_, partial)) = partials.iter().find(|(k, _)| *k == kind) else {
                continue;
            };
            let Some(raw) = partial.get(&spec.name) else {
                continue;
            };
            match validate(spec, raw) {
                Some(value) => {
                    record.insert(&spec.name, value, kind);
                    break;
                }
                None => {
                    tracing::debug!(
                        field = %spec.name,
                        strategy = %kind,
                        candidate = %raw,
                        "candidate rejected by validator"
                    );
                }
            }
        }
    }

    split_headquarters(schema, &mut record);
    record
}

/// Best-effort split of a composite headquarters string into the
/// discrete city/region/country fields, when the schema defines them
/// and no strategy filled them directly. Last comma segment is the
/// country, first is the city, the middle of exactly three parts is
/// the region. Heuristic, not authoritative.
fn split_headquarters(schema: &FieldSchema, record: &mut ConsolidatedRecord) {
    let Some(hq) = record.get("headquarters").cloned() else {
        return;
    };
    let parts: Vec<&str> = hq
        .value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < 2 {
        return;
    }

    let mut assign = |field: &str, raw: &str| {
        if !record.contains(field) {
            if let Some(spec) = schema.get(field) {
                if let Some(value) = validate(spec, raw) {
                    record.insert(field, value, hq.source);
                }
            }
        }
    };

    assign("city", parts[0]);
    assign("country", parts[parts.len() - 1]);
    if parts.len() == 3 {
        assign("region", parts[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::{EntityKind, FieldKind, FieldSpec};

    fn schema() -> FieldSchema {
        FieldSchema::new(EntityKind::Company)
            .field(FieldSpec::new("company_name", FieldKind::Text))
            .field(FieldSpec::new("founded", FieldKind::Year))
            .field(FieldSpec::new("website", FieldKind::Url))
            .field(FieldSpec::new("headquarters", FieldKind::Text))
            .field(FieldSpec::new("city", FieldKind::Text))
            .field(FieldSpec::new("region", FieldKind::Text))
            .field(FieldSpec::new("country", FieldKind::Country))
    }

    fn partial(pairs: &[(&str, &str)]) -> PartialRecord {
        let mut p = PartialRecord::new();
        for (field, value) in pairs {
            p.insert(*field, *value);
        }
        p
    }

    #[test]
    fn test_priority_order_resolves_conflicts() {
        let partials = vec![
            (
                StrategyKind::Contextual,
                partial(&[("company_name", "Acme From Text")]),
            ),
            (
                StrategyKind::Embedded,
                partial(&[("company_name", "Acme Corp")]),
            ),
        ];

        let record = consolidate(&schema(), &partials);
        assert_eq!(record.value_of("company_name"), Some("Acme Corp"));
        assert_eq!(record.source_of("company_name"), Some(StrategyKind::Embedded));
    }

    #[test]
    fn test_invalid_candidate_falls_through_to_next_strategy() {
        // The embedded candidate is a CDN image URL and must lose to the
        // valid selector candidate despite higher priority.
        let partials = vec![
            (
                StrategyKind::Embedded,
                partial(&[("website", "https://scontent.cdninstagram.com/pic.jpg")]),
            ),
            (
                StrategyKind::Selector,
                partial(&[("website", "https://acme.example.com/")]),
            ),
        ];

        let record = consolidate(&schema(), &partials);
        assert_eq!(record.value_of("website"), Some("https://acme.example.com/"));
        assert_eq!(record.source_of("website"), Some(StrategyKind::Selector));
    }

    #[test]
    fn test_unfillable_fields_are_absent() {
        let partials = vec![(StrategyKind::Pattern, partial(&[("founded", "1492")]))];
        let record = consolidate(&schema(), &partials);
        assert!(!record.contains("founded"));
        assert!(!record.contains("company_name"));
    }

    #[test]
    fn test_headquarters_split_three_parts() {
        let partials = vec![(
            StrategyKind::Embedded,
            partial(&[("headquarters", "Austin, TX, United States")]),
        )];

        let record = consolidate(&schema(), &partials);
        assert_eq!(record.value_of("city"), Some("Austin"));
        assert_eq!(record.value_of("region"), Some("TX"));
        assert_eq!(record.value_of("country"), Some("US"));
        assert_eq!(record.source_of("city"), Some(StrategyKind::Embedded));
    }

    #[test]
    fn test_headquarters_split_two_parts_skips_region() {
        let partials = vec![(
            StrategyKind::Selector,
            partial(&[("headquarters", "Berlin, Germany")]),
        )];

        let record = consolidate(&schema(), &partials);
        assert_eq!(record.value_of("city"), Some("Berlin"));
        assert_eq!(record.value_of("country"), Some("DE"));
        assert!(!record.contains("region"));
    }

    #[test]
    fn test_split_does_not_override_direct_values() {
        let partials = vec![
            (
                StrategyKind::Embedded,
                partial(&[("city", "Lisbon"), ("headquarters", "Porto, Portugal")]),
            ),
        ];

        let record = consolidate(&schema(), &partials);
        assert_eq!(record.value_of("city"), Some("Lisbon"));
        assert_eq!(record.value_of("country"), Some("PT"));
    }
}
