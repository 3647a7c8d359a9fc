//! Testing utilities including mock backends.
//!
//! Useful for testing applications that use the extraction library
//! without making real network calls. Mock backends play back a script
//! of outcomes, one per `fetch` call, and record every call for order
//! assertions.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AcquisitionError, AcquisitionResult};
use crate::traits::backend::{ContentBackend, FetchRequest, StructuredBackend};
use crate::types::document::{AcquiredDocument, AcquisitionMethod};
use crate::types::schema::FieldSchema;

/// One scripted outcome for a mock backend call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return a document with this HTML
    Html(String),
    /// Return a document with this markdown
    Markdown(String),
    /// Fail with an API error carrying this message
    Error(String),
    /// Sleep long enough to trip any reasonable test timeout
    Hang(Duration),
}

/// A scripted content backend.
///
/// Outcomes are consumed in order; calls past the end of the script
/// fail. Every call's URL is recorded.
pub struct MockBackend {
    name: String,
    method: AcquisitionMethod,
    script: Mutex<Vec<MockOutcome>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Create a mock with a script of outcomes.
    pub fn new(name: impl Into<String>, script: Vec<MockOutcome>) -> Self {
        Self {
            name: name.into(),
            method: AcquisitionMethod::HttpFetch,
            script: Mutex::new(script),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Single-outcome convenience constructor.
    pub fn once(name: impl Into<String>, outcome: MockOutcome) -> Self {
        Self::new(name, vec![outcome])
    }

    /// Report a different acquisition method.
    pub fn with_method(mut self, method: AcquisitionMethod) -> Self {
        self.method = method;
        self
    }

    /// Handle to the recorded call URLs.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    fn next_outcome(&self) -> Option<MockOutcome> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            None
        } else {
            Some(script.remove(0))
        }
    }
}

#[async_trait]
impl ContentBackend for MockBackend {
    async fn fetch(&self, request: &FetchRequest) -> AcquisitionResult<AcquiredDocument> {
        self.calls.lock().unwrap().push(request.url.clone());

        match self.next_outcome() {
            Some(MockOutcome::Html(html)) => {
                Ok(AcquiredDocument::new(&request.url, &self.name).with_html(html))
            }
            Some(MockOutcome::Markdown(md)) => {
                Ok(AcquiredDocument::new(&request.url, &self.name).with_markdown(md))
            }
            Some(MockOutcome::Error(message)) => Err(AcquisitionError::Api {
                status: 500,
                message,
            }),
            Some(MockOutcome::Hang(duration)) => {
                tokio::time::sleep(duration).await;
                Err(AcquisitionError::NoContent {
                    url: request.url.clone(),
                })
            }
            None => Err(AcquisitionError::Api {
                status: 500,
                message: "mock script exhausted".into(),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn method(&self) -> AcquisitionMethod {
        self.method
    }
}

/// A scripted structured-extraction backend.
pub struct MockStructuredBackend {
    name: String,
    payload: Mutex<Option<AcquisitionResult<serde_json::Map<String, Value>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockStructuredBackend {
    /// Succeed once with this payload.
    pub fn with_payload(payload: Value) -> Self {
        let map = payload
            .as_object()
            .cloned()
            .unwrap_or_default();
        Self {
            name: "mock-structured".into(),
            payload: Mutex::new(Some(Ok(map))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail once with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            name: "mock-structured".into(),
            payload: Mutex::new(Some(Err(AcquisitionError::Api {
                status: 500,
                message: message.into(),
            }))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the recorded call URLs.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl StructuredBackend for MockStructuredBackend {
    async fn extract_structured(
        &self,
        request: &FetchRequest,
        _schema: &FieldSchema,
        _prompt_hint: &str,
    ) -> AcquisitionResult<serde_json::Map<String, Value>> {
        self.calls.lock().unwrap().push(request.url.clone());
        self.payload
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| {
                Err(AcquisitionError::Api {
                    status: 500,
                    message: "mock payload already consumed".into(),
                })
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A company page fixture exercising several strategies at once:
/// JSON-LD block, selector targets, meta tags, and free text.
pub fn company_page_fixture() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
  <title>Acme Corp | LinkedIn</title>
  <meta property="og:title" content="Acme Corp | LinkedIn" />
  <meta property="og:description" content="Acme Corp builds dependable industrial robots for factories worldwide." />
  <script type="application/ld+json">
  {
    "@type": "Organization",
    "name": "Acme Corp",
    "foundingDate": "2005",
    "url": "https://acme.example.com",
    "address": {
      "addressLocality": "Austin",
      "addressRegion": "TX",
      "addressCountry": "United States"
    }
  }
  </script>
</head>
<body>
  <h1 data-test="company-name">Acme Corp</h1>
  <dl>
    <div data-test="about-us__industry"><dt>Industry</dt><dd>Software</dd></div>
    <div data-test="about-us__size"><dt>Company size</dt><dd>1,001-5,000 employees</dd></div>
  </dl>
  <section class="about">
    <p>Acme Corp builds dependable industrial robots. We have 3,400 employees
    and were founded in 2005. Headquartered in Austin, Texas.</p>
    <p>Questions? Email sales@acme.com or WhatsApp: +1 555 010 2030.</p>
  </section>
</body>
</html>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_plays_script_in_order() {
        let backend = MockBackend::new(
            "mock",
            vec![
                MockOutcome::Error("boom".into()),
                MockOutcome::Html("<p>hello</p>".into()),
            ],
        );
        let request = FetchRequest::new("https://example.com");

        assert!(backend.fetch(&request).await.is_err());
        let doc = backend.fetch(&request).await.unwrap();
        assert_eq!(doc.html.as_deref(), Some("<p>hello</p>"));
        assert!(backend.fetch(&request).await.is_err());

        assert_eq!(backend.calls().lock().unwrap().len(), 3);
    }
}
