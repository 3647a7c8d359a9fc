//! Concrete acquisition backend adapters.
//!
//! Three interchangeable families, ordered roughly from most-structured
//! to most-brittle: a hosted scrape/extract API, a headless-browser
//! automation service, and a plain HTTP fetcher. Each adapter maps its
//! provider's native response shape into [`AcquiredDocument`] (or a raw
//! field map for the structured fast-path) before anything reaches the
//! consolidation engine.
//!
//! [`AcquiredDocument`]: crate::types::document::AcquiredDocument

mod browser;
mod http;
mod scrape_api;

pub use browser::BrowserBackend;
pub use http::PlainHttpBackend;
pub use scrape_api::ScrapeApiBackend;
