//! The backend fallback chain.
//!
//! Per extraction call, backends are attempted strictly one at a time
//! in a fixed order, from most-structured to most-generic. A backend
//! that errors or times out advances the chain; a backend that produces
//! content has the full strategy set, consolidation, and scoring run
//! over its output. The chain stops at the first result whose
//! confidence reaches the policy threshold and otherwise keeps the
//! best-confidence result seen as a fallback. Backends are never run in
//! parallel: each call is a paid, blocking network operation and a
//! second one buys nothing once the first is acceptable.

use std::sync::Arc;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::ChainPolicy;
use crate::consolidate::consolidate;
use crate::contacts::ContactSniffer;
use crate::error::{AcquisitionError, ExtractionError, Result};
use crate::score::score;
use crate::strategies::{run_all, Strategy};
use crate::traits::backend::{ContentBackend, FetchRequest, StructuredBackend};
use crate::types::contact::ContactBundle;
use crate::types::document::AcquisitionMethod;
use crate::types::record::{ConsolidatedRecord, PartialRecord, StrategyKind};
use crate::types::result::{AttemptOutcome, AttemptReport};
use crate::types::schema::FieldSchema;

/// One link in the chain: either a document fetcher whose output feeds
/// the local strategies, or a remote structured extractor whose payload
/// is validated directly.
pub enum ChainBackend {
    Fetch(Arc<dyn ContentBackend>),
    Structured(Arc<dyn StructuredBackend>),
}

impl ChainBackend {
    fn name(&self) -> &str {
        match self {
            ChainBackend::Fetch(b) => b.name(),
            ChainBackend::Structured(b) => b.name(),
        }
    }

    fn method(&self) -> AcquisitionMethod {
        match self {
            ChainBackend::Fetch(b) => b.method(),
            ChainBackend::Structured(_) => AcquisitionMethod::StructuredApi,
        }
    }
}

/// The best-scoring extraction produced by any backend so far.
pub struct ScoredExtraction {
    pub record: ConsolidatedRecord,
    pub confidence: f32,
    pub method: AcquisitionMethod,
    pub backend: String,
}

/// What the chain hands back to the facade.
pub struct ChainOutcome {
    /// Best extraction seen, if any backend produced content
    pub best: Option<ScoredExtraction>,

    /// Every backend attempted, in order
    pub attempts: Vec<AttemptReport>,

    /// Whether any backend produced content at all
    pub any_content: bool,
}

/// Sequential fallback chain over a fixed backend order.
pub struct FallbackChain {
    backends: Vec<ChainBackend>,
    policy: ChainPolicy,
}

impl FallbackChain {
    pub fn new(backends: Vec<ChainBackend>, policy: ChainPolicy) -> Self {
        Self { backends, policy }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Run the chain for one target.
    ///
    /// The contact bundle accumulates across every attempt; cancellation
    /// aborts the in-flight backend call and prevents the next one from
    /// starting.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &self,
        request: &FetchRequest,
        schema: &FieldSchema,
        strategies: &[Box<dyn Strategy>],
        sniffer: &ContactSniffer,
        contacts: &mut ContactBundle,
        cancel: &CancellationToken,
    ) -> Result<ChainOutcome> {
        let mut outcome = ChainOutcome {
            best: None,
            attempts: Vec::with_capacity(self.backends.len()),
            any_content: false,
        };

        for backend in &self.backends {
            if cancel.is_cancelled() {
                return Err(ExtractionError::Cancelled);
            }

            let name = backend.name().to_string();
            let method = backend.method();
            tracing::debug!(backend = %name, url = %request.url, "trying backend");

            match self
                .attempt(backend, request, schema, strategies, sniffer, contacts, cancel)
                .await
            {
                Ok(scored) => {
                    outcome.any_content = true;
                    let confidence = scored.confidence;
                    outcome.attempts.push(AttemptReport {
                        backend: name.clone(),
                        method,
                        outcome: AttemptOutcome::Scored { confidence },
                    });

                    let is_better = outcome
                        .best
                        .as_ref()
                        .map_or(true, |best| confidence > best.confidence);
                    if is_better {
                        outcome.best = Some(scored);
                    }

                    if confidence >= self.policy.accept_confidence {
                        tracing::info!(
                            backend = %name,
                            confidence,
                            threshold = self.policy.accept_confidence,
                            "confidence threshold reached, stopping chain"
                        );
                        break;
                    }
                    tracing::debug!(
                        backend = %name,
                        confidence,
                        "confidence below threshold, advancing chain"
                    );
                }
                Err(AcquisitionError::Cancelled) => {
                    return Err(ExtractionError::Cancelled);
                }
                Err(e) => {
                    tracing::warn!(backend = %name, error = %e, "backend failed, advancing chain");
                    outcome.attempts.push(AttemptReport {
                        backend: name,
                        method,
                        outcome: AttemptOutcome::Failed {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// One backend attempt: acquire, extract, consolidate, score.
    #[allow(clippy::too_many_arguments)]
    async fn attempt(
        &self,
        backend: &ChainBackend,
        request: &FetchRequest,
        schema: &FieldSchema,
        strategies: &[Box<dyn Strategy>],
        sniffer: &ContactSniffer,
        contacts: &mut ContactBundle,
        cancel: &CancellationToken,
    ) -> std::result::Result<ScoredExtraction, AcquisitionError> {
        let record = match backend {
            ChainBackend::Fetch(fetcher) => {
                let doc = self
                    .bounded(cancel, &request.url, fetcher.fetch(request))
                    .await?;
                if !doc.has_content() {
                    return Err(AcquisitionError::NoContent {
                        url: request.url.clone(),
                    });
                }
                sniffer.accumulate(&doc.plain_text(), contacts);
                let partials = run_all(strategies, &doc);
                consolidate(schema, &partials)
            }
            ChainBackend::Structured(remote) => {
                let prompt = structured_prompt(schema);
                let data = self
                    .bounded(
                        cancel,
                        &request.url,
                        remote.extract_structured(request, schema, &prompt),
                    )
                    .await?;
                let partial = adapt_structured(&data);
                if partial.is_empty() {
                    return Err(AcquisitionError::NoContent {
                        url: request.url.clone(),
                    });
                }
                for (_, value) in partial.iter() {
                    sniffer.accumulate(value, contacts);
                }
                consolidate(schema, &[(StrategyKind::Remote, partial)])
            }
        };

        Ok(ScoredExtraction {
            confidence: score(schema, &record),
            record,
            method: backend.method(),
            backend: backend.name().to_string(),
        })
    }

    /// Race a backend call against its timeout and the cancellation
    /// token. Timeouts are reported as `Timeout` so they advance the
    /// chain exactly like an error.
    async fn bounded<T>(
        &self,
        cancel: &CancellationToken,
        url: &str,
        call: impl std::future::Future<Output = std::result::Result<T, AcquisitionError>>,
    ) -> std::result::Result<T, AcquisitionError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(AcquisitionError::Cancelled),
            result = timeout(self.policy.backend_timeout, call) => match result {
                Ok(inner) => inner,
                Err(_) => Err(AcquisitionError::Timeout { url: url.to_string() }),
            },
        }
    }
}

/// Map a remote structured payload into a partial record, stringifying
/// scalar values and joining arrays. Nulls and objects are dropped.
fn adapt_structured(data: &serde_json::Map<String, serde_json::Value>) -> PartialRecord {
    let mut partial = PartialRecord::new();
    for (field, value) in data {
        let rendered = match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        };
        if let Some(rendered) = rendered {
            partial.insert(field, rendered);
        }
    }
    partial
}

/// The prompt hint handed to remote structured extraction, built from
/// the schema's field hints.
fn structured_prompt(schema: &FieldSchema) -> String {
    let fields: Vec<String> = schema
        .fields()
        .map(|spec| {
            if spec.hint.is_empty() {
                spec.name.clone()
            } else {
                format!("{} ({})", spec.name, spec.hint)
            }
        })
        .collect();
    format!(
        "Extract the following {} attributes from the page: {}",
        schema.entity,
        fields.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_structured_stringifies_scalars() {
        let data = serde_json::json!({
            "company_name": "Acme Corp",
            "founded": 1998,
            "specialties": ["robots", "lasers"],
            "ignored_null": null,
            "ignored_object": {"a": 1},
        });
        let partial = adapt_structured(data.as_object().unwrap());

        assert_eq!(partial.get("company_name"), Some("Acme Corp"));
        assert_eq!(partial.get("founded"), Some("1998"));
        assert_eq!(partial.get("specialties"), Some("robots, lasers"));
        assert_eq!(partial.get("ignored_null"), None);
        assert_eq!(partial.get("ignored_object"), None);
    }

    #[test]
    fn test_structured_prompt_includes_hints() {
        use crate::types::schema::{EntityKind, FieldKind, FieldSpec};
        let schema = crate::types::schema::FieldSchema::new(EntityKind::Company)
            .field(FieldSpec::new("company_name", FieldKind::Text).hint("Legal name"))
            .field(FieldSpec::new("founded", FieldKind::Year));

        let prompt = structured_prompt(&schema);
        assert!(prompt.contains("company_name (Legal name)"));
        assert!(prompt.contains("founded"));
        assert!(prompt.starts_with("Extract the following company"));
    }
}
