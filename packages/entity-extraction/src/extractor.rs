//! The entity extraction facade.
//!
//! One [`EntityExtractor`] per entity type wires a field schema, the
//! local strategy set, the contact sniffer, and a backend fallback
//! chain into a single `extract(target)` call. This is the only
//! surface callers see; routes and jobs never touch strategies or the
//! chain directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use entity_extraction::{ChainBackend, EntityExtractor, PlainHttpBackend};
//! use std::sync::Arc;
//!
//! let extractor = EntityExtractor::company(vec![ChainBackend::Fetch(
//!     Arc::new(PlainHttpBackend::new()?),
//! )]);
//! let result = extractor.extract("acme.example.com").await?;
//! println!("{} fields at confidence {}", result.record.len(), result.confidence);
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::chain::{ChainBackend, FallbackChain};
use crate::config::ExtractorConfig;
use crate::contacts::ContactSniffer;
use crate::entities::{default_config, schema_for};
use crate::error::{ExtractionError, Result};
use crate::security::TargetGuard;
use crate::strategies::{default_strategies, Strategy};
use crate::traits::backend::FetchRequest;
use crate::types::contact::ContactBundle;
use crate::types::result::ExtractionResult;
use crate::types::schema::{EntityKind, FieldSchema};

/// Query parameters stripped during target normalization. Shortened
/// and shared links carry these; the canonical page does not.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "igshid", "igsh", "ref", "ref_src"];

/// Per-entity-type extraction facade.
pub struct EntityExtractor {
    entity: EntityKind,
    schema: Arc<FieldSchema>,
    strategies: Vec<Box<dyn Strategy>>,
    chain: FallbackChain,
    sniffer: ContactSniffer,
    guard: TargetGuard,
    config: ExtractorConfig,
}

impl EntityExtractor {
    /// Build an extractor with the built-in schema and default
    /// configuration for an entity type.
    pub fn new(entity: EntityKind, backends: Vec<ChainBackend>) -> Self {
        Self::with_config(entity, backends, default_config(entity))
    }

    /// Build with a custom configuration.
    pub fn with_config(
        entity: EntityKind,
        backends: Vec<ChainBackend>,
        config: ExtractorConfig,
    ) -> Self {
        let schema = Arc::new(schema_for(entity));
        let strategies = default_strategies(&schema);
        Self {
            entity,
            chain: FallbackChain::new(backends, config.policy.clone()),
            sniffer: ContactSniffer::new(config.contacts.clone()),
            guard: TargetGuard::new(),
            schema,
            strategies,
            config,
        }
    }

    /// Company page extractor.
    pub fn company(backends: Vec<ChainBackend>) -> Self {
        Self::new(EntityKind::Company, backends)
    }

    /// Social profile extractor.
    pub fn social_profile(backends: Vec<ChainBackend>) -> Self {
        Self::new(EntityKind::SocialProfile, backends)
    }

    /// Business listing extractor.
    pub fn business_listing(backends: Vec<ChainBackend>) -> Self {
        Self::new(EntityKind::BusinessListing, backends)
    }

    /// Replace the SSRF guard (tests exempt their fixture host).
    pub fn with_guard(mut self, guard: TargetGuard) -> Self {
        self.guard = guard;
        self
    }

    /// The schema this extractor fills.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Turn caller input into a canonical, fetchable target URL.
    ///
    /// Accepts a full URL, a bare domain, or (for profile-like entity
    /// types) a bare `@username`. Tracking parameters from shared and
    /// shortened links are dropped.
    pub fn normalize_target(&self, input: &str) -> Result<String> {
        let input = input.trim().trim_end_matches('/');
        if input.is_empty() {
            return Err(ExtractionError::InvalidTarget {
                reason: "empty target".into(),
            });
        }

        let candidate = if input.starts_with("http://") || input.starts_with("https://") {
            input.to_string()
        } else if let Some(username) = input.strip_prefix('@') {
            self.profile_url(username)?
        } else if input.contains('.') && !input.contains(char::is_whitespace) {
            format!("https://{input}")
        } else {
            self.profile_url(input)?
        };

        let mut parsed =
            url::Url::parse(&candidate).map_err(|e| ExtractionError::InvalidTarget {
                reason: e.to_string(),
            })?;

        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.as_ref()) && !k.starts_with("utm_"))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed
                .query_pairs_mut()
                .clear()
                .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(parsed.to_string())
    }

    fn profile_url(&self, username: &str) -> Result<String> {
        let username = username.trim();
        let valid = !username.is_empty()
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
        if !valid {
            return Err(ExtractionError::InvalidTarget {
                reason: format!("not a username or URL: {username}"),
            });
        }
        let template = self.config.profile_url_template.as_deref().ok_or_else(|| {
            ExtractionError::InvalidTarget {
                reason: "bare username given but no profile URL template configured".into(),
            }
        })?;
        Ok(template.replace("{username}", username))
    }

    /// Extract the entity behind a target URL or username.
    ///
    /// Always returns a result for anything that went wrong during
    /// acquisition; `Err` is reserved for targets that cannot be
    /// normalized or are blocked, and for caller cancellation.
    pub async fn extract(&self, target: &str) -> Result<ExtractionResult> {
        self.extract_cancellable(target, &CancellationToken::new())
            .await
    }

    /// [`extract`](Self::extract) with caller-driven cancellation: the
    /// in-flight backend call is aborted and no further backend starts.
    pub async fn extract_cancellable(
        &self,
        target: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult> {
        if self.chain.is_empty() {
            return Err(ExtractionError::NoBackends);
        }

        let session = Uuid::new_v4();
        let url = self.normalize_target(target)?;
        self.guard.validate(&url)?;

        let span = tracing::info_span!(
            "extract",
            entity = %self.entity,
            target = %url,
            session = %session
        );

        async {
            tracing::info!("starting extraction");

            let request = FetchRequest::new(&url).with_hints(self.config.hints.clone());
            let mut contacts = ContactBundle::new();
            let outcome = self
                .chain
                .run(
                    &request,
                    &self.schema,
                    &self.strategies,
                    &self.sniffer,
                    &mut contacts,
                    cancel,
                )
                .await?;

            let result = match outcome.best {
                Some(best) => {
                    let success = best.confidence >= self.config.policy.accept_confidence;
                    tracing::info!(
                        confidence = best.confidence,
                        fields = best.record.len(),
                        contacts = contacts.len(),
                        backend = %best.backend,
                        success,
                        "extraction finished"
                    );
                    ExtractionResult {
                        id: session,
                        entity: self.entity,
                        target: url.clone(),
                        strategies_used: best.record.strategies_used(),
                        record: best.record,
                        contacts,
                        confidence: best.confidence,
                        method: Some(best.method),
                        attempts: outcome.attempts,
                        success,
                    }
                }
                None => {
                    tracing::warn!(
                        attempts = outcome.attempts.len(),
                        "no backend produced content"
                    );
                    let mut result = ExtractionResult::total_failure(
                        self.entity,
                        url.clone(),
                        outcome.attempts,
                    );
                    result.id = session;
                    result.contacts = contacts;
                    result
                }
            };

            Ok(result)
        }
        .instrument(span)
        .await
    }
}
