//! Configuration types for the extraction pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Confidence at which the chain stops for company and listing pages.
pub const CONFIDENCE_ACCEPT: f32 = 50.0;

/// Confidence demanded of noisy social profile pages before the chain
/// stops early.
pub const CONFIDENCE_STOP_EARLY: f32 = 80.0;

/// Default wall-clock limit for a single backend call.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(45);

/// Policy driving the fallback chain's advance/stop decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainPolicy {
    /// Minimum confidence at which a result is accepted and the chain
    /// stops. Results below this keep the chain advancing; the best
    /// one seen is retained as a fallback.
    pub accept_confidence: f32,

    /// Per-backend call timeout. A timeout advances the chain exactly
    /// like a backend error.
    #[serde(with = "duration_secs")]
    pub backend_timeout: Duration,
}

impl Default for ChainPolicy {
    fn default() -> Self {
        Self {
            accept_confidence: CONFIDENCE_ACCEPT,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }
}

impl ChainPolicy {
    /// Set the accept threshold.
    pub fn with_accept_confidence(mut self, confidence: f32) -> Self {
        self.accept_confidence = confidence;
        self
    }

    /// Set the per-backend timeout.
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }
}

/// Acquisition hints passed through to backends that understand them.
///
/// The core never interprets these; each backend maps what it supports
/// into its own request shape and ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionHints {
    /// Milliseconds to wait for dynamic content to settle
    pub wait_ms: Option<u64>,

    /// CSS selector whose appearance marks the page as ready
    pub ready_selector: Option<String>,

    /// Whether to scroll the viewport to trigger lazy content
    pub scroll: bool,
}

impl AcquisitionHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settle wait.
    pub fn with_wait_ms(mut self, ms: u64) -> Self {
        self.wait_ms = Some(ms);
        self
    }

    /// Set the readiness selector.
    pub fn with_ready_selector(mut self, selector: impl Into<String>) -> Self {
        self.ready_selector = Some(selector.into());
        self
    }

    /// Request viewport scrolling.
    pub fn with_scroll(mut self) -> Self {
        self.scroll = true;
        self
    }
}

/// Options for contact accumulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Country calling code applied to phone numbers that lack one but
    /// match a recognizable national format (e.g. `"55"`). None leaves
    /// bare national numbers unprefixed.
    pub default_country_code: Option<String>,
}

/// Full per-extractor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Chain advance/stop policy
    pub policy: ChainPolicy,

    /// Hints forwarded to acquisition backends
    pub hints: AcquisitionHints,

    /// Contact accumulation options
    pub contacts: ContactConfig,

    /// Template used to turn a bare username into a canonical profile
    /// URL, with `{username}` as the placeholder. Only meaningful for
    /// profile-like entity types.
    pub profile_url_template: Option<String>,
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain policy.
    pub fn with_policy(mut self, policy: ChainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set acquisition hints.
    pub fn with_hints(mut self, hints: AcquisitionHints) -> Self {
        self.hints = hints;
        self
    }

    /// Set contact options.
    pub fn with_contacts(mut self, contacts: ContactConfig) -> Self {
        self.contacts = contacts;
        self
    }

    /// Set the profile URL template.
    pub fn with_profile_url_template(mut self, template: impl Into<String>) -> Self {
        self.profile_url_template = Some(template.into());
        self
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
