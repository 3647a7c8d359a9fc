//! Acquired documents - the raw material every strategy reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a document (or structured payload) was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    /// Hosted scrape API (server-side rendering and markdown conversion)
    ScrapeApi,
    /// Hosted structured-extraction endpoint (remote fast-path)
    StructuredApi,
    /// Headless browser automation service
    HeadlessBrowser,
    /// Plain HTTP fetch
    HttpFetch,
}

impl std::fmt::Display for AcquisitionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionMethod::ScrapeApi => write!(f, "scrape_api"),
            AcquisitionMethod::StructuredApi => write!(f, "structured_api"),
            AcquisitionMethod::HeadlessBrowser => write!(f, "headless_browser"),
            AcquisitionMethod::HttpFetch => write!(f, "http_fetch"),
        }
    }
}

/// A raw document produced by one acquisition backend.
///
/// Backends return HTML, markdown, or both. Strategies pick whichever
/// representation they can work with and must tolerate either being
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquiredDocument {
    /// URL the content was acquired from
    pub url: String,

    /// Raw HTML, if the backend produced it
    pub html: Option<String>,

    /// Markdown rendition, if the backend produced it
    pub markdown: Option<String>,

    /// When the content was fetched
    pub fetched_at: DateTime<Utc>,

    /// Name of the backend that produced this document
    pub backend: String,

    /// Backend-specific metadata (headers, render stats)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl AcquiredDocument {
    /// Create a document with no content yet.
    pub fn new(url: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: None,
            markdown: None,
            fetched_at: Utc::now(),
            backend: backend.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach HTML content.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Attach markdown content.
    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    /// Add a metadata key-value pair.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the document carries any non-blank content.
    pub fn has_content(&self) -> bool {
        self.html.as_deref().is_some_and(|h| !h.trim().is_empty())
            || self.markdown.as_deref().is_some_and(|m| !m.trim().is_empty())
    }

    /// The raw text strategies scan with patterns: HTML when present,
    /// markdown otherwise.
    pub fn raw_text(&self) -> &str {
        self.html
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .or(self.markdown.as_deref())
            .unwrap_or("")
    }

    /// Tag-stripped plain text with collapsed whitespace.
    ///
    /// Used by the contextual strategy and the contact extractor, which
    /// both want prose rather than markup.
    pub fn plain_text(&self) -> String {
        if let Some(html) = self.html.as_deref().filter(|h| !h.trim().is_empty()) {
            let doc = scraper::Html::parse_document(html);
            let text: Vec<&str> = doc.root_element().text().collect();
            return text
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
        }
        self.markdown
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_detection() {
        let empty = AcquiredDocument::new("https://example.com", "test").with_html("   ");
        assert!(!empty.has_content());

        let page = AcquiredDocument::new("https://example.com", "test").with_html("<p>hi</p>");
        assert!(page.has_content());
    }

    #[test]
    fn test_raw_text_prefers_html() {
        let doc = AcquiredDocument::new("https://example.com", "test")
            .with_html("<p>html body</p>")
            .with_markdown("markdown body");
        assert_eq!(doc.raw_text(), "<p>html body</p>");

        let md_only = AcquiredDocument::new("https://example.com", "test")
            .with_markdown("markdown body");
        assert_eq!(md_only.raw_text(), "markdown body");
    }

    #[test]
    fn test_plain_text_strips_tags() {
        let doc = AcquiredDocument::new("https://example.com", "test")
            .with_html("<div><h1>Acme</h1>\n  <p>Founded in   1998.</p></div>");
        assert_eq!(doc.plain_text(), "Acme Founded in 1998.");
    }
}
