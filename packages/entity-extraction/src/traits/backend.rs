//! Acquisition backend traits.
//!
//! The core's only outward-facing boundary: it consumes content
//! acquisition and, optionally, remote structured extraction from
//! interchangeable backends. Implementations are thin HTTP adapters
//! (see the `backends` module); each owns the mapping from its
//! provider's native response shape into the crate's common types, so
//! nothing provider-shaped leaks past this seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::AcquisitionHints;
use crate::error::AcquisitionResult;
use crate::types::document::{AcquiredDocument, AcquisitionMethod};
use crate::types::schema::FieldSchema;

/// One content acquisition request, target plus pass-through hints.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Normalized target URL
    pub url: String,

    /// Backend hints (wait, readiness selector, scroll)
    pub hints: AcquisitionHints,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            hints: AcquisitionHints::default(),
        }
    }

    /// Attach acquisition hints.
    pub fn with_hints(mut self, hints: AcquisitionHints) -> Self {
        self.hints = hints;
        self
    }
}

/// A backend that can turn a target URL into a raw document.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Acquire the target's content. Implementations must return
    /// `AcquisitionError::NoContent` rather than an empty document.
    async fn fetch(&self, request: &FetchRequest) -> AcquisitionResult<AcquiredDocument>;

    /// Backend name for logs and attempt reports.
    fn name(&self) -> &str;

    /// The acquisition method this backend implements.
    fn method(&self) -> AcquisitionMethod;
}

/// A backend that offers server-side structured extraction, the
/// optional fast-path that replaces the local strategy set for one
/// attempt. The returned map is still validated locally before any of
/// it is trusted.
#[async_trait]
pub trait StructuredBackend: Send + Sync {
    /// Extract the schema's fields from the target remotely. Keys of
    /// the returned map are field names; values are whatever the
    /// provider produced and are re-validated by the caller.
    async fn extract_structured(
        &self,
        request: &FetchRequest,
        schema: &FieldSchema,
        prompt_hint: &str,
    ) -> AcquisitionResult<serde_json::Map<String, Value>>;

    /// Backend name for logs and attempt reports.
    fn name(&self) -> &str;
}
