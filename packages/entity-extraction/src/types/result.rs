//! The extraction result - the one object callers receive.
//!
//! Callers always get a result, never a hard error, for anything that
//! went wrong during acquisition: degraded partial data is preferred
//! over no data. `success` reflects whether the best attempt reached the
//! entity's confidence threshold; `attempts` records every backend tried
//! in order, including the ones that failed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact::ContactBundle;
use super::document::AcquisitionMethod;
use super::record::{ConsolidatedRecord, StrategyKind};
use super::schema::EntityKind;

/// Outcome of one backend attempt inside the fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttemptOutcome {
    /// The backend produced content that was extracted and scored
    Scored { confidence: f32 },
    /// The backend errored or timed out
    Failed { reason: String },
}

/// One entry in the chain's attempt log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Backend name (for logs and diagnostics)
    pub backend: String,

    /// The acquisition method the backend implements
    pub method: AcquisitionMethod,

    /// What happened
    pub outcome: AttemptOutcome,
}

/// The consolidated output of one `extract()` call. Immutable once
/// returned; owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Session id, also attached to every tracing event of the call
    pub id: Uuid,

    /// The entity type that was extracted
    pub entity: EntityKind,

    /// The normalized target URL
    pub target: String,

    /// Validated entity fields with provenance
    pub record: ConsolidatedRecord,

    /// All contact values accumulated across every attempt
    pub contacts: ContactBundle,

    /// Confidence score in [0, 100]
    pub confidence: f32,

    /// Distinct strategies that contributed to the winning record
    pub strategies_used: Vec<StrategyKind>,

    /// Acquisition method that produced the winning record, if any
    /// backend produced content at all
    pub method: Option<AcquisitionMethod>,

    /// Every backend attempted, in chain order
    pub attempts: Vec<AttemptReport>,

    /// Whether the best attempt reached the entity's confidence threshold
    pub success: bool,
}

impl ExtractionResult {
    /// A result for a chain where no backend produced any document:
    /// empty record, confidence 0, `success = false`.
    pub fn total_failure(
        entity: EntityKind,
        target: impl Into<String>,
        attempts: Vec<AttemptReport>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            target: target.into(),
            record: ConsolidatedRecord::new(),
            contacts: ContactBundle::new(),
            confidence: 0.0,
            strategies_used: Vec::new(),
            method: None,
            attempts,
            success: false,
        }
    }

    /// Names of the acquisition methods attempted, in order.
    pub fn methods_attempted(&self) -> Vec<AcquisitionMethod> {
        self.attempts.iter().map(|a| a.method).collect()
    }

    /// Whether any usable field was extracted.
    pub fn has_data(&self) -> bool {
        !self.record.is_empty() || !self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_failure_shape() {
        let result = ExtractionResult::total_failure(
            EntityKind::Company,
            "https://example.com",
            vec![AttemptReport {
                backend: "http".into(),
                method: AcquisitionMethod::HttpFetch,
                outcome: AttemptOutcome::Failed {
                    reason: "timeout".into(),
                },
            }],
        );

        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert!(result.record.is_empty());
        assert!(!result.has_data());
        assert_eq!(result.methods_attempted(), vec![AcquisitionMethod::HttpFetch]);
    }
}
