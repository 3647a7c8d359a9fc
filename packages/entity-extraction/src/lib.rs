//! Multi-Strategy Entity Extraction Library
//!
//! Extracts structured entity data (company, social profile, and
//! business-listing attributes) from unreliable, semi-structured public
//! web pages. Several independent strategies scan the same document;
//! every candidate value is validated and normalized; the candidates
//! are consolidated by fixed priority into one best-effort record with
//! a 0 to 100 confidence score and per-field provenance.
//!
//! # Design
//!
//! - **Strategies over one document** - embedded JSON-LD metadata, DOM
//!   selectors, meta tags, raw-text patterns, and loose contextual
//!   cues. Independent and order-insensitive; a strategy that cannot
//!   work with a document returns an empty partial.
//! - **Validation before trust** - no value enters a record without
//!   passing its field's validator, whichever strategy or remote
//!   service produced it.
//! - **Backend fallback chain** - content acquisition is consumed
//!   through the [`ContentBackend`]/[`StructuredBackend`] traits.
//!   Backends are tried sequentially, most-structured first; errors
//!   and low-confidence results advance the chain, and the best result
//!   seen is always kept.
//! - **Degraded data beats no data** - callers always receive an
//!   [`ExtractionResult`] with `success` and `confidence`; hard errors
//!   are reserved for invalid targets and cancellation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use entity_extraction::{
//!     ChainBackend, EntityExtractor, PlainHttpBackend, ScrapeApiBackend,
//! };
//! use std::sync::Arc;
//!
//! let scrape_api = Arc::new(ScrapeApiBackend::from_env()?);
//! let extractor = EntityExtractor::company(vec![
//!     ChainBackend::Structured(scrape_api.clone()),
//!     ChainBackend::Fetch(scrape_api),
//!     ChainBackend::Fetch(Arc::new(PlainHttpBackend::new()?)),
//! ]);
//!
//! let result = extractor.extract("acme.example.com").await?;
//! if result.success {
//!     println!("{:?} at confidence {}", result.record, result.confidence);
//! }
//! ```
//!
//! # Modules
//!
//! - [`extractor`] - the per-entity-type facade callers use
//! - [`strategies`] - the five local extraction techniques
//! - [`validate`] - per-field cleaning and type coercion
//! - [`consolidate`] - priority merge of strategy partials
//! - [`score`] - confidence scoring
//! - [`contacts`] - multi-value contact accumulation
//! - [`chain`] - the sequential backend fallback chain
//! - [`backends`] - concrete acquisition adapters
//! - [`testing`] - scripted mocks and fixtures

pub mod backends;
pub mod chain;
pub mod config;
pub mod consolidate;
pub mod contacts;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod score;
pub mod security;
pub mod strategies;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export core types at crate root
pub use error::{AcquisitionError, ExtractionError, Result, SecurityError};
pub use traits::backend::{ContentBackend, FetchRequest, StructuredBackend};
pub use types::{
    contact::ContactBundle,
    document::{AcquiredDocument, AcquisitionMethod},
    record::{ConsolidatedRecord, FieldValue, PartialRecord, StrategyKind, STRATEGY_PRIORITY},
    result::{AttemptOutcome, AttemptReport, ExtractionResult},
    schema::{EntityKind, FieldKind, FieldSchema, FieldSpec},
};

// Re-export the facade and chain
pub use chain::{ChainBackend, FallbackChain};
pub use extractor::EntityExtractor;

// Re-export configuration
pub use config::{
    AcquisitionHints, ChainPolicy, ContactConfig, ExtractorConfig, CONFIDENCE_ACCEPT,
    CONFIDENCE_STOP_EARLY,
};

// Re-export pipeline pieces for callers that assemble their own flow
pub use consolidate::consolidate;
pub use contacts::ContactSniffer;
pub use entities::{business_listing_schema, company_schema, schema_for, social_profile_schema};
pub use score::score;
pub use security::TargetGuard;
pub use strategies::{default_strategies, run_all, Strategy};

// Re-export backends
pub use backends::{BrowserBackend, PlainHttpBackend, ScrapeApiBackend};
